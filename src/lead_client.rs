use crate::config::ClientConfig;
use crate::endpoints::{self, EndpointKind, API_VERSION_DEFAULT, API_VERSION_LEADS_UPDATE};
use crate::errors::LeadError;
use crate::models::{is_blank_str, LeadData, LeadRef, LeadStatus, TrackingContext};
use crate::transport::{self, Delivery, Transport};
use reqwest::Method;
use serde_json::{json, Map, Value};

/// Client for the RD Station lead API.
///
/// The public fields may be reassigned between calls.
#[derive(Clone)]
pub struct LeadClient {
    pub private_token: String,
    pub public_token: Option<String>,
    pub base_url: String,
    pub default_identifier: String,
    pub plaintext_transport: bool,
    pub capture_response: bool,
    transport: Transport,
}

impl std::fmt::Debug for LeadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadClient")
            .field("private_token", &"[REDACTED]")
            .field("public_token", &self.public_token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("default_identifier", &self.default_identifier)
            .field("plaintext_transport", &self.plaintext_transport)
            .field("capture_response", &self.capture_response)
            .finish()
    }
}

impl LeadClient {
    /// Creates a client with the default base URL and identifier.
    ///
    /// # Arguments
    ///
    /// * `private_token` - Account API key, required.
    /// * `public_token` - Token sent with new leads, only needed by `create_lead`.
    pub fn new(
        private_token: impl Into<String>,
        public_token: Option<String>,
    ) -> Result<Self, LeadError> {
        Self::from_config(ClientConfig::new(private_token, public_token))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, LeadError> {
        if config.private_token.is_empty() {
            return Err(LeadError::NotConfigured(
                "Inform the private token as the first argument".to_string(),
            ));
        }

        if config.plaintext_transport && config.base_url.starts_with("https://") {
            tracing::warn!(
                "Base URL {} is https but plaintext transport is enabled; requests go out unencrypted",
                config.base_url
            );
        }

        Ok(Self {
            private_token: config.private_token,
            public_token: config.public_token.filter(|t| !t.is_empty()),
            base_url: config.base_url,
            default_identifier: config.default_identifier,
            plaintext_transport: config.plaintext_transport,
            capture_response: config.capture_response,
            transport: Transport::new()?,
        })
    }

    /// Endpoint URL for `kind` at `version`.
    pub fn resolve_url(&self, kind: EndpointKind, version: &str) -> String {
        endpoints::build_url(&self.base_url, &self.private_token, kind, version)
    }

    /// Registers a new lead (a conversion).
    ///
    /// Unset `identificador`, `client_id` and `traffic_source` fields are
    /// filled from the default identifier and the tracking context.
    pub async fn create_lead(
        &self,
        email: &str,
        data: LeadData,
        tracking: Option<&TrackingContext>,
    ) -> Result<Delivery, LeadError> {
        self.require_public_token()?;
        let payload = self.conversion_payload(email, data, tracking)?;

        tracing::info!("Sending new lead {} to RD Station", email);
        let url = self.resolve_url(EndpointKind::Conversions, API_VERSION_DEFAULT);
        self.send(Method::POST, &url, payload).await
    }

    /// Updates lead attributes. No argument validation is applied.
    pub async fn update_lead(&self, email: &str, data: LeadData) -> Result<Delivery, LeadError> {
        let payload = self.update_payload(data);

        tracing::info!("Updating lead {} in RD Station", email);
        let url = format!(
            "{}{}",
            self.resolve_url(EndpointKind::Leads, API_VERSION_LEADS_UPDATE),
            email
        );
        self.send(Method::PUT, &url, payload).await
    }

    /// Moves a lead to a funnel stage (see `LifecycleStage`) and sets its opportunity flag.
    pub async fn update_lead_stage_and_opportunity(
        &self,
        email: &str,
        new_stage: impl Into<i64>,
        opportunity: bool,
    ) -> Result<Delivery, LeadError> {
        if is_blank_str(email) {
            return Err(LeadError::InvalidArgument(
                "Inform the lead email as the first argument".to_string(),
            ));
        }
        let new_stage = new_stage.into();
        let payload = self.stage_payload(new_stage, opportunity);

        tracing::info!(
            "Moving lead {} to stage {} (opportunity: {})",
            email,
            new_stage,
            opportunity
        );
        let url = format!(
            "{}{}",
            self.resolve_url(EndpointKind::Leads, API_VERSION_DEFAULT),
            email
        );
        self.send(Method::PUT, &url, payload).await
    }

    /// Marks a lead as won or lost.
    ///
    /// # Arguments
    ///
    /// * `lead` - Lead email or unique custom id.
    /// * `status` - `"won"` or `"lost"`.
    /// * `value` - Purchase value.
    /// * `lost_reason` - Why the deal was lost.
    pub async fn update_lead_status(
        &self,
        lead: impl Into<LeadRef>,
        status: &str,
        value: Option<f64>,
        lost_reason: Option<&str>,
    ) -> Result<Delivery, LeadError> {
        let lead = lead.into();
        let payload = status_payload(&lead, status, value, lost_reason)?;

        tracing::info!("Marking lead {} as {}", lead, status);
        let url = self.resolve_url(EndpointKind::Generic, API_VERSION_DEFAULT);
        self.send(Method::POST, &url, payload).await
    }

    fn require_public_token(&self) -> Result<(), LeadError> {
        match self.public_token.as_deref() {
            Some(token) if !is_blank_str(token) => Ok(()),
            _ => Err(LeadError::NotConfigured(
                "Inform the public token when creating the client to send new leads".to_string(),
            )),
        }
    }

    fn conversion_payload(
        &self,
        email: &str,
        mut data: LeadData,
        tracking: Option<&TrackingContext>,
    ) -> Result<Map<String, Value>, LeadError> {
        if is_blank_str(email) {
            return Err(LeadError::InvalidArgument(
                "Inform at least the lead email as the first argument".to_string(),
            ));
        }

        data.set_if_blank("identificador", self.default_identifier.as_str());

        if let Some(tracking) = tracking {
            if let Some(ref client_id) = tracking.client_id {
                data.set_if_blank("client_id", client_id.as_str());
            }
            if let Some(ref source) = tracking.traffic_source {
                data.set_if_blank("traffic_source", source.as_str());
            }
        }

        data.set("email", email);
        Ok(data.into_map())
    }

    fn update_payload(&self, data: LeadData) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("lead".to_string(), Value::Object(data.into_map()));
        payload.insert("auth_token".to_string(), json!(self.private_token));
        payload
    }

    fn stage_payload(&self, new_stage: i64, opportunity: bool) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("auth_token".to_string(), json!(self.private_token));
        payload.insert(
            "lead".to_string(),
            json!({
                "lifecycle_stage": new_stage,
                "opportunity": opportunity,
            }),
        );
        payload
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        payload: Map<String, Value>,
    ) -> Result<Delivery, LeadError> {
        let log_url = endpoints::redact(url, &self.private_token);
        let target = transport::target_url(url, self.plaintext_transport)?;
        let body = transport::encode_payload(payload, self.public_token.as_deref())?;

        self.transport
            .dispatch(method, target, body, self.capture_response, &log_url)
            .await
    }
}

fn status_payload(
    lead: &LeadRef,
    status: &str,
    value: Option<f64>,
    lost_reason: Option<&str>,
) -> Result<Map<String, Value>, LeadError> {
    if lead.is_blank() {
        return Err(LeadError::InvalidArgument(
            "Inform the lead email or unique custom id as the first argument".to_string(),
        ));
    }
    let status: LeadStatus = status.parse()?;

    let mut payload = Map::new();
    payload.insert("status".to_string(), json!(status.as_str()));
    payload.insert("value".to_string(), json!(value));
    payload.insert("lost_reason".to_string(), json!(lost_reason));

    let (field, id) = lead.field();
    payload.insert(field.to_string(), id);
    Ok(payload)
}
