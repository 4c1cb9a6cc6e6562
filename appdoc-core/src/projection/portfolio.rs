//! Portfolio figures shown on activated and in-review documents.

use rust_decimal::Decimal;

use super::ProjectionError;
use crate::models::{Fund, Product};

/// Every fund across every product, in product order then fund order.
pub fn flatten_funds(products: &[Product]) -> Vec<Fund> {
    products
        .iter()
        .flat_map(|product| product.funds.iter().cloned())
        .collect()
}

/// Sum over `funds` of `(amount - fees) * tax_rate`.
///
/// Not rounded; the template decides how to display it.
///
/// # Errors
///
/// [`ProjectionError::PortfolioOverflow`] if any intermediate value leaves
/// the range of [`Decimal`].
pub fn portfolio_total(funds: &[Fund], tax_rate: Decimal) -> Result<Decimal, ProjectionError> {
    funds.iter().try_fold(Decimal::ZERO, |total, fund| {
        fund.amount
            .checked_sub(fund.fees)
            .and_then(|net| net.checked_mul(tax_rate))
            .and_then(|taxed| total.checked_add(taxed))
            .ok_or_else(|| ProjectionError::PortfolioOverflow(fund.name.clone()))
    })
}
