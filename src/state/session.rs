use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{Item, ItemCode, RecommendRequest, RecommendedItem, Strategy},
};

use super::selection::SelectionStore;
use super::sequence::RequestTicket;

/// How the last request ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { count: usize },
    Failure { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecommendationStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Request in flight; submission disabled
    Pending { ticket: RequestTicket },
    /// Last request answered (or failed)
    Settled {
        outcome: Outcome,
        settled_at: DateTime<Utc>,
    },
}

/// Recommendation request lifecycle and the last received results
#[derive(Debug, Clone, Default)]
pub struct RecommendationSession {
    status: RecommendationStatus,
    results: Vec<RecommendedItem>,
}

impl RecommendationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &RecommendationStatus {
        &self.status
    }

    /// Results of the last successful request, in backend order
    pub fn results(&self) -> &[RecommendedItem] {
        &self.results
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RecommendationStatus::Pending { .. })
    }

    /// Submission is enabled only with a non-empty cart and nothing in flight
    pub fn can_submit(&self, selection: &SelectionStore) -> bool {
        !selection.is_empty() && !self.is_pending()
    }

    /// Moves to `Pending` and returns the request body to send
    pub fn submit(
        &mut self,
        selection: &SelectionStore,
        strategy: Strategy,
        ticket: RequestTicket,
    ) -> AppResult<RecommendRequest> {
        if selection.is_empty() {
            return Err(AppError::InvalidInput(
                "Cannot request recommendations for an empty cart".to_string(),
            ));
        }
        if self.is_pending() {
            return Err(AppError::InvalidInput(
                "A recommendation request is already pending".to_string(),
            ));
        }

        let request = build_request(selection, strategy);
        self.status = RecommendationStatus::Pending { ticket };
        Ok(request)
    }

    /// Applies a response for `ticket`
    ///
    /// Returns false when the ticket is not the one in flight; the response is
    /// then ignored.
    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        result: AppResult<Vec<RecommendedItem>>,
    ) -> bool {
        match &self.status {
            RecommendationStatus::Pending { ticket: pending } if *pending == ticket => {}
            _ => return false,
        }

        let outcome = match result {
            Ok(recommendations) => {
                let count = recommendations.len();
                self.results = recommendations;
                Outcome::Success { count }
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq, error = %e, "Recommendation request failed");
                self.results.clear();
                Outcome::Failure {
                    reason: e.to_string(),
                }
            }
        };

        self.status = RecommendationStatus::Settled {
            outcome,
            settled_at: Utc::now(),
        };
        true
    }

    pub fn find(&self, code: &ItemCode) -> Option<&RecommendedItem> {
        self.results.iter().find(|rec| &rec.code() == code)
    }

    /// Adds a recommended item to the cart unless it is already there
    pub fn accept(&self, code: &ItemCode, selection: &mut SelectionStore) -> bool {
        match self.find(code) {
            Some(rec) => selection.add_if_absent(Item::from(rec)),
            None => {
                tracing::debug!(code = %code, "Accepted item is not among current recommendations");
                false
            }
        }
    }
}

/// Request body for the current cart, codes in cart order
pub fn build_request(selection: &SelectionStore, strategy: Strategy) -> RecommendRequest {
    RecommendRequest {
        selected_items: selection
            .codes()
            .into_iter()
            .map(|code| code.as_str().to_string())
            .collect(),
        preference_type: strategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sequence::{Resource, Sequencer};

    fn cart_with_apple() -> SelectionStore {
        let mut selection = SelectionStore::new();
        selection.toggle(Item::from_label("A1 - Apple"));
        selection
    }

    fn cherry() -> RecommendedItem {
        RecommendedItem {
            kode: "C3".to_string(),
            nama: "Cherry".to_string(),
            harga: 5000.0,
        }
    }

    #[test]
    fn test_empty_cart_cannot_submit() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let selection = SelectionStore::new();

        assert!(!session.can_submit(&selection));
        let result = session.submit(
            &selection,
            Strategy::Item,
            sequencer.issue(Resource::Recommendation),
        );
        assert!(result.is_err());
        assert_eq!(session.status(), &RecommendationStatus::Idle);
    }

    #[test]
    fn test_submit_builds_request_from_codes() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let ticket = sequencer.issue(Resource::Recommendation);

        let request = session
            .submit(&cart_with_apple(), Strategy::Item, ticket)
            .unwrap();

        assert_eq!(request.selected_items, vec!["A1".to_string()]);
        assert_eq!(request.preference_type, Strategy::Item);
        assert_eq!(session.status(), &RecommendationStatus::Pending { ticket });
    }

    #[test]
    fn test_submit_while_pending_is_rejected() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let selection = cart_with_apple();

        session
            .submit(&selection, Strategy::User, sequencer.issue(Resource::Recommendation))
            .unwrap();
        assert!(!session.can_submit(&selection));
        assert!(session
            .submit(&selection, Strategy::User, sequencer.issue(Resource::Recommendation))
            .is_err());
    }

    #[test]
    fn test_settle_success_replaces_results_verbatim() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let ticket = sequencer.issue(Resource::Recommendation);
        session.submit(&cart_with_apple(), Strategy::Item, ticket).unwrap();

        assert!(session.settle(ticket, Ok(vec![cherry()])));
        assert_eq!(session.results(), &[cherry()]);
        assert!(matches!(
            session.status(),
            RecommendationStatus::Settled {
                outcome: Outcome::Success { count: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_settle_failure_clears_results() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let selection = cart_with_apple();

        let first = sequencer.issue(Resource::Recommendation);
        session.submit(&selection, Strategy::Item, first).unwrap();
        session.settle(first, Ok(vec![cherry()]));

        let second = sequencer.issue(Resource::Recommendation);
        session.submit(&selection, Strategy::Brand, second).unwrap();
        session.settle(
            second,
            Err(AppError::ExternalApi("API returned status 500".to_string())),
        );

        assert!(session.results().is_empty());
        assert!(matches!(
            session.status(),
            RecommendationStatus::Settled {
                outcome: Outcome::Failure { .. },
                ..
            }
        ));
        assert!(session.can_submit(&selection));
    }

    #[test]
    fn test_settle_ignores_foreign_ticket() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let stale = sequencer.issue(Resource::Recommendation);
        let current = sequencer.issue(Resource::Recommendation);
        session.submit(&cart_with_apple(), Strategy::Item, current).unwrap();

        assert!(!session.settle(stale, Ok(vec![cherry()])));
        assert!(session.is_pending());
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_accept_adds_label_once() {
        let mut session = RecommendationSession::new();
        let mut sequencer = Sequencer::default();
        let mut selection = cart_with_apple();
        let ticket = sequencer.issue(Resource::Recommendation);
        session.submit(&selection, Strategy::Item, ticket).unwrap();
        session.settle(ticket, Ok(vec![cherry()]));

        let code = ItemCode::new("C3");
        assert!(session.accept(&code, &mut selection));
        assert!(!session.accept(&code, &mut selection));

        let entry = selection.get(&code).unwrap();
        assert_eq!(entry.label(), "C3 - Cherry");
        assert_eq!(entry.quantity.get(), 1);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_accept_unknown_code_is_noop() {
        let session = RecommendationSession::new();
        let mut selection = SelectionStore::new();
        assert!(!session.accept(&ItemCode::new("C3"), &mut selection));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_request_codes_invert_accepted_labels() {
        let mut selection = SelectionStore::new();
        selection.add_if_absent(Item::from(&cherry()));
        let request = build_request(&selection, Strategy::Item);
        assert_eq!(request.selected_items, vec![cherry().kode]);
    }
}
