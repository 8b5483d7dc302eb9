use uuid::Uuid;

use crate::domain::repository::RelationRepository;
use crate::domain::types::CartTotal;
use crate::error::ApiError;

/// Render aggregated cart totals as the plain-text shopping list, one
/// `"<name> - <sum> (<unit>)"` line per ingredient, no trailing newline.
/// Line order follows the input order.
pub fn render_shopping_list(totals: &[CartTotal]) -> String {
    totals
        .iter()
        .map(|t| format!("{} - {} ({})", t.name, t.total, t.measurement_unit))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── DownloadShoppingList ─────────────────────────────────────────────────────

pub struct DownloadShoppingListUseCase<RL: RelationRepository> {
    pub relations: RL,
}

impl<RL: RelationRepository> DownloadShoppingListUseCase<RL> {
    pub async fn execute(&self, user_id: Uuid) -> Result<String, ApiError> {
        let totals = self.relations.cart_totals(user_id).await?;
        Ok(render_shopping_list(&totals))
    }
}
