use async_trait::async_trait;

use crate::domain::SortOrder;

// La capa de presentación implementa esto para mostrar avisos (los "toasts").
#[async_trait]
pub trait Notifier: Send + Sync {
  async fn refreshed(&self);
  async fn refresh_failed(&self, message: &str);
  async fn sort_changed(&self, order: SortOrder);
}
