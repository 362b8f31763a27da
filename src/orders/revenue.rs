use crate::model::MonthlyRevenue;
use crate::store::Reducer;

/// Server-computed revenue figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueState {
    pub total: f64,
    pub monthly: MonthlyRevenue,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevenueAction {
    TotalLoaded(f64),
    MonthlyPending,
    MonthlyLoaded(MonthlyRevenue),
    Rejected(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RevenueReducer;

impl Reducer for RevenueReducer {
    type State = RevenueState;
    type Action = RevenueAction;

    fn reduce(&self, state: &mut RevenueState, action: RevenueAction) {
        match action {
            RevenueAction::TotalLoaded(total) => state.total = total,
            RevenueAction::MonthlyPending => {
                state.loading = true;
                state.error = None;
            }
            RevenueAction::MonthlyLoaded(monthly) => {
                state.loading = false;
                state.monthly = monthly;
            }
            RevenueAction::Rejected(message) => {
                state.loading = false;
                state.error = Some(message);
            }
        }
    }
}
