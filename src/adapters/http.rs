use crate::domain::model::{
    Booking, BookingDraft, BookingId, Cafe, CafeId, Slot, SlotId, Table, TableId,
};
use crate::domain::ports::{AvailabilityProvider, BookingGateway};
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// reqwest adapter for the booking backend's REST API. Implements both
/// ports so one instance can back a whole flow. All transport and status
/// failures are converted into `BookingError` here; nothing above this
/// layer sees a raw `reqwest::Error`.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}/{}", self.base_url, path)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, context, "backend response");
            return Ok(response.json::<T>().await?);
        }
        Err(BookingError::AvailabilityError {
            message: format!("{} returned {}", context, status),
        })
    }

    /// Pulls the human-readable `detail` field the backend puts into its
    /// validation errors, falling back to the raw body.
    async fn rejection_reason(response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or(body)
    }
}

#[async_trait]
impl AvailabilityProvider for RestBackend {
    async fn fetch_cafe(&self, cafe_id: CafeId) -> Result<Cafe> {
        tracing::debug!(cafe = %cafe_id, "fetching cafe");
        let response = self.get(&format!("cafes/{}", cafe_id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BookingError::CafeNotFoundError { cafe_id });
        }
        self.read_json(response, "cafe fetch").await
    }

    async fn list_slots(
        &self,
        cafe_id: CafeId,
        date: Option<NaiveDate>,
        table_id: Option<TableId>,
        active_only: bool,
    ) -> Result<Vec<Slot>> {
        let mut query: Vec<(&str, String)> = vec![("active_only", active_only.to_string())];
        if let Some(date) = date {
            query.push(("booking_date", date.to_string()));
        }
        if let Some(table_id) = table_id {
            query.push(("table_id", table_id.to_string()));
        }

        tracing::debug!(cafe = %cafe_id, ?date, ?table_id, "listing available slots");
        let response = self
            .get(&format!("cafe/{}/slots", cafe_id))
            .query(&query)
            .send()
            .await?;
        self.read_json(response, "slot availability").await
    }

    async fn list_tables(
        &self,
        cafe_id: CafeId,
        date: Option<NaiveDate>,
        slot_id: Option<SlotId>,
        active_only: bool,
    ) -> Result<Vec<Table>> {
        let mut query: Vec<(&str, String)> = vec![("active_only", active_only.to_string())];
        if let Some(date) = date {
            query.push(("booking_date", date.to_string()));
        }
        if let Some(slot_id) = slot_id {
            query.push(("slot_id", slot_id.to_string()));
        }

        tracing::debug!(cafe = %cafe_id, ?date, ?slot_id, "listing available tables");
        let response = self
            .get(&format!("cafe/{}/tables", cafe_id))
            .query(&query)
            .send()
            .await?;
        self.read_json(response, "table availability").await
    }
}

#[async_trait]
impl BookingGateway for RestBackend {
    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking> {
        let response = self
            .authorized(self.client.post(format!("{}/booking", self.base_url)))
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Booking>().await?);
        }

        // The backend answers 400/409/422 with a {"detail": ...} body when
        // it independently decides the pair is no longer available. That
        // race is surfaced verbatim, never masked or retried.
        if status.is_client_error() {
            let reason = Self::rejection_reason(response).await;
            return Err(BookingError::RejectedError { reason });
        }
        Err(BookingError::AvailabilityError {
            message: format!("booking creation returned {}", status),
        })
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<()> {
        let response = self
            .authorized(
                self.client
                    .delete(format!("{}/booking/{}", self.base_url, booking_id)),
            )
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status.is_client_error() {
            let reason = Self::rejection_reason(response).await;
            return Err(BookingError::RejectedError { reason });
        }
        Err(BookingError::AvailabilityError {
            message: format!("booking cancellation returned {}", status),
        })
    }
}
