//! Goal store client
//!
//! Turns forms into validated writes and reads into displayable goals.
//! Writes are only ever dispatched; whether the store applied them is
//! learned from the next read.

use crate::error::StoreError;
use crate::transport::Transport;
use crate::wire::{decode_records, Mutation};
use goalboard_model::{retain_displayable, Goal, GoalDraft, GoalEdit, RowIndex};
use tracing::{debug, info, warn};

/// Client for the remote goal store
#[derive(Debug, Clone)]
pub struct GoalClient<T> {
    transport: T,
}

impl<T: Transport> GoalClient<T> {
    /// Create a client over a transport
    #[inline]
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read every goal the store holds and keep the displayable ones
    ///
    /// Records that fail to decode or fail the display filter are dropped.
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`] if the read fails and
    /// [`StoreError::MalformedResponse`] if the body is not a record array
    pub async fn fetch_all(&self) -> Result<Vec<Goal>, StoreError> {
        let body = self.transport.read().await?;
        let decoded = match decode_records(&body) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(error = %err, "discarding unreadable goal list");
                return Err(err);
            }
        };

        for (position, rejection) in &decoded.rejected {
            debug!(position, %rejection, "dropping undecodable record");
        }

        let decoded_count = decoded.goals.len();
        let goals = retain_displayable(decoded.goals);
        info!(
            goals = goals.len(),
            dropped = decoded.rejected.len() + decoded_count - goals.len(),
            "fetched goals"
        );
        Ok(goals)
    }

    /// Validate an add form and submit it as a new goal
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] without sending anything if the
    /// form is incomplete, or [`StoreError::Transport`] if the submit fails
    pub async fn create(&self, draft: &GoalDraft) -> Result<(), StoreError> {
        self.dispatch(&Mutation::create(draft)?).await
    }

    /// Validate an edit form and submit it over its row
    ///
    /// # Errors
    /// As [`GoalClient::create`], plus a validation error if the edit has no
    /// persisted row
    pub async fn update(&self, edit: &GoalEdit) -> Result<(), StoreError> {
        self.dispatch(&Mutation::update(edit)?).await
    }

    /// Submit a delete for a persisted row
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] without sending anything if `row`
    /// is `None`, or [`StoreError::Transport`] if the submit fails
    pub async fn remove(&self, row: Option<&RowIndex>) -> Result<(), StoreError> {
        self.dispatch(&Mutation::delete(row)?).await
    }

    /// Submit an already validated write
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`] if the submit fails
    pub async fn dispatch(&self, mutation: &Mutation) -> Result<(), StoreError> {
        let kind = mutation.kind();
        info!(%kind, row = ?mutation.row(), "dispatching mutation");

        if let Err(err) = self.transport.submit(mutation.body()).await {
            warn!(%kind, error = %err, "mutation not delivered");
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use goalboard_model::{Field, ValidationError};
    use mockall::predicate::eq;
    use serde_json::{json, Value};

    mockall::mock! {
        Remote {}

        #[async_trait]
        impl Transport for Remote {
            async fn read(&self) -> Result<String, TransportError>;
            async fn submit(&self, body: Value) -> Result<(), TransportError>;
        }
    }

    fn valid_draft() -> GoalDraft {
        GoalDraft::new()
            .with(Field::Description, "Run")
            .with(Field::InitialValue, "0")
            .with(Field::EndValue, "100")
            .with(Field::Category, "Fitness")
            .with(Field::Units, "mi")
    }

    #[tokio::test]
    async fn fetch_applies_display_filter() {
        let mut remote = MockRemote::new();
        remote.expect_read().times(1).returning(|| {
            Ok(r#"[
                {"description":"Run","endValue":100,"category":"Fitness","rowIndex":2},
                {"description":"","endValue":5,"category":"Fitness","rowIndex":3},
                {"description":"Read","endValue":30,"category":"","rowIndex":4},
                {"description":"Swim","category":"Fitness","rowIndex":5}
            ]"#
            .to_string())
        });

        let goals = GoalClient::new(remote).fetch_all().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].description, "Run");
        assert_eq!(retain_displayable(goals.clone()), goals);
    }

    #[tokio::test]
    async fn fetch_reports_malformed_body() {
        let mut remote = MockRemote::new();
        remote
            .expect_read()
            .returning(|| Ok(r#"{"error":"script failed"}"#.to_string()));

        let err = GoalClient::new(remote).fetch_all().await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn fetch_reports_transport_failure() {
        let mut remote = MockRemote::new();
        remote
            .expect_read()
            .returning(|| Err(TransportError::Network("connection refused".to_string())));

        let err = GoalClient::new(remote).fetch_all().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn create_submits_body() {
        let mut remote = MockRemote::new();
        remote
            .expect_submit()
            .with(eq(json!({
                "description": "Run",
                "initialValue": 0.0,
                "currentValue": null,
                "endValue": 100.0,
                "category": "Fitness",
                "units": "mi",
                "bgColor": "#ffffff",
            })))
            .times(1)
            .returning(|_| Ok(()));

        GoalClient::new(remote).create(&valid_draft()).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_create_never_submits() {
        let mut remote = MockRemote::new();
        remote.expect_submit().never();

        let draft = valid_draft().with(Field::Category, "");
        let err = GoalClient::new(remote).create(&draft).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::MissingField(Field::Category))
        );
    }

    #[tokio::test]
    async fn update_requires_row() {
        let mut remote = MockRemote::new();
        remote.expect_submit().never();

        let edit = GoalEdit {
            draft: valid_draft(),
            row_index: None,
        };
        let err = GoalClient::new(remote).update(&edit).await.unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::NotPersisted));
    }

    #[tokio::test]
    async fn remove_submits_delete_action() {
        let mut remote = MockRemote::new();
        remote
            .expect_submit()
            .with(eq(json!({"action": "delete", "rowIndex": 7})))
            .times(1)
            .returning(|_| Ok(()));

        let client = GoalClient::new(remote);
        client.remove(RowIndex::number(7).as_ref()).await.unwrap();
    }

    #[tokio::test]
    async fn remove_rejects_row_zero_locally() {
        let mut remote = MockRemote::new();
        remote.expect_submit().never();

        let err = GoalClient::new(remote)
            .remove(RowIndex::number(0).as_ref())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn submit_failure_is_transport_error() {
        let mut remote = MockRemote::new();
        remote
            .expect_submit()
            .returning(|_| Err(TransportError::Network("dns".to_string())));

        let err = GoalClient::new(remote).create(&valid_draft()).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Transport(TransportError::Network("dns".to_string()))
        );
    }
}
