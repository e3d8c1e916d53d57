use crate::errors::LeadError;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Returns true when a payload value counts as unset.
///
/// Null, `""`, `"0"`, `false`, zero and empty arrays/objects are all unset,
/// so a caller-supplied `""` still receives the default.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => is_blank_str(s),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// String form of [`is_blank`], used for emails and other required text arguments.
pub fn is_blank_str(value: &str) -> bool {
    value.is_empty() || value == "0"
}

/// Attributes of a lead, sent as a flat JSON object.
///
/// There is no fixed schema; the setters cover the fields RD Station documents
/// for conversions and `insert` accepts anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadData(Map<String, Value>);

impl LeadData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Lead-source identifier (`identificador`), e.g. `"contact-form"`.
    pub fn identifier(self, value: impl Into<String>) -> Self {
        self.insert("identificador", value.into())
    }

    pub fn name(self, value: impl Into<String>) -> Self {
        self.insert("nome", value.into())
    }

    pub fn company(self, value: impl Into<String>) -> Self {
        self.insert("empresa", value.into())
    }

    pub fn job_title(self, value: impl Into<String>) -> Self {
        self.insert("cargo", value.into())
    }

    pub fn phone(self, value: impl Into<String>) -> Self {
        self.insert("telefone", value.into())
    }

    pub fn mobile_phone(self, value: impl Into<String>) -> Self {
        self.insert("celular", value.into())
    }

    pub fn website(self, value: impl Into<String>) -> Self {
        self.insert("website", value.into())
    }

    pub fn twitter(self, value: impl Into<String>) -> Self {
        self.insert("twitter", value.into())
    }

    pub fn facebook(self, value: impl Into<String>) -> Self {
        self.insert("facebook", value.into())
    }

    /// Google Analytics `__utmz` cookie contents.
    pub fn utmz(self, value: impl Into<String>) -> Self {
        self.insert("c_utmz", value.into())
    }

    pub fn created_at(self, value: impl Into<String>) -> Self {
        self.insert("created_at", value.into())
    }

    /// Comma separated tags, e.g. `"cofounder, hotlead"`.
    pub fn tags(self, value: impl Into<String>) -> Self {
        self.insert("tags", value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when `key` is missing or holds a blank value.
    pub fn is_unset(&self, key: &str) -> bool {
        self.0.get(key).map_or(true, is_blank)
    }

    /// Sets `key` only when it is currently unset.
    pub fn set_if_blank(&mut self, key: &str, value: impl Into<Value>) {
        if self.is_unset(key) {
            self.0.insert(key.to_string(), value.into());
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for LeadData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for LeadData {
    type Error = LeadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(LeadError::InvalidArgument(format!(
                "Lead data must be a JSON object, got {}",
                other
            ))),
        }
    }
}

/// How a lead is addressed by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadRef {
    /// Sent as `email`.
    ByEmail(String),
    /// Lead unique custom ID, sent as `lead_id`.
    ById(i64),
}

impl LeadRef {
    pub fn is_blank(&self) -> bool {
        match self {
            LeadRef::ByEmail(email) => is_blank_str(email),
            LeadRef::ById(id) => *id == 0,
        }
    }

    /// Payload field name and value for this reference.
    pub fn field(&self) -> (&'static str, Value) {
        match self {
            LeadRef::ByEmail(email) => ("email", Value::from(email.as_str())),
            LeadRef::ById(id) => ("lead_id", Value::from(*id)),
        }
    }
}

impl From<&str> for LeadRef {
    fn from(email: &str) -> Self {
        LeadRef::ByEmail(email.to_string())
    }
}

impl From<String> for LeadRef {
    fn from(email: String) -> Self {
        LeadRef::ByEmail(email)
    }
}

impl From<i64> for LeadRef {
    fn from(id: i64) -> Self {
        LeadRef::ById(id)
    }
}

impl fmt::Display for LeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadRef::ByEmail(email) => write!(f, "{}", email),
            LeadRef::ById(id) => write!(f, "#{}", id),
        }
    }
}

/// Final outcome of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    Won,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(LeadError::InvalidArgument(
                "Lead status is required".to_string(),
            )),
            "won" => Ok(LeadStatus::Won),
            "lost" => Ok(LeadStatus::Lost),
            other => Err(LeadError::InvalidArgument(format!(
                "Lead status should be 'won' or 'lost', got '{}'",
                other
            ))),
        }
    }
}

/// Funnel position codes accepted by the lead update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Lead = 0,
    QualifiedLead = 1,
    Customer = 2,
}

impl From<LifecycleStage> for i64 {
    fn from(stage: LifecycleStage) -> Self {
        stage as i64
    }
}

const CLIENT_ID_COOKIE: &str = "rdtrk";
const TRAFFIC_SOURCE_COOKIE: &str = "__trf_src";

/// Tracking values taken from the visitor's browser cookies.
///
/// The embedding web application extracts these from the request it is
/// handling and hands them to `create_lead`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingContext {
    pub client_id: Option<String>,
    pub traffic_source: Option<String>,
}

impl TrackingContext {
    pub fn new(client_id: Option<String>, traffic_source: Option<String>) -> Self {
        Self {
            client_id: client_id.filter(|s| !s.is_empty()),
            traffic_source: traffic_source.filter(|s| !s.is_empty()),
        }
    }

    /// Builds the context from raw `rdtrk` and `__trf_src` cookie values.
    ///
    /// `rdtrk` holds a JSON object whose `id` becomes the client id; a value
    /// that does not decode leaves the client id unset.
    pub fn from_cookies(rdtrk: Option<&str>, trf_src: Option<&str>) -> Self {
        let client_id = rdtrk
            .map(decode_cookie)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| parse_client_id(&raw));
        let traffic_source = trf_src.map(decode_cookie).filter(|s| !s.is_empty());

        Self {
            client_id,
            traffic_source,
        }
    }

    /// Builds the context from a raw `Cookie` request header.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut rdtrk = None;
        let mut trf_src = None;

        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            match name.trim() {
                CLIENT_ID_COOKIE => rdtrk = Some(value.trim()),
                TRAFFIC_SOURCE_COOKIE => trf_src = Some(value.trim()),
                _ => {}
            }
        }

        Self::from_cookies(rdtrk, trf_src)
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.is_none() && self.traffic_source.is_none()
    }
}

fn decode_cookie(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn parse_client_id(raw: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Ignoring undecodable rdtrk cookie: {}", e);
            return None;
        }
    };

    match value.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_blank_rules() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("0")));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!(0.0)));
        assert!(is_blank(&json!(false)));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));

        assert!(!is_blank(&json!("x")));
        assert!(!is_blank(&json!(1)));
        assert!(!is_blank(&json!(true)));
        assert!(!is_blank(&json!(["a"])));

        assert!(is_blank_str(""));
        assert!(is_blank_str("0"));
        assert!(!is_blank_str("00"));
        assert!(!is_blank_str("a@b.com"));
    }

    #[test]
    fn test_set_if_blank_keeps_existing() {
        let mut data = LeadData::new().identifier("contact-form");
        data.set_if_blank("identificador", "default");
        assert_eq!(data.get("identificador"), Some(&json!("contact-form")));

        let mut data = LeadData::new().identifier("");
        data.set_if_blank("identificador", "default");
        assert_eq!(data.get("identificador"), Some(&json!("default")));
    }

    #[test]
    fn test_lead_data_setters_use_api_field_names() {
        let data = LeadData::new()
            .name("Júlio Paulillo")
            .company("Agendor")
            .job_title("Cofounder")
            .mobile_phone("(11) 99999-9999")
            .tags("cofounder, hotlead");

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            json!({
                "nome": "Júlio Paulillo",
                "empresa": "Agendor",
                "cargo": "Cofounder",
                "celular": "(11) 99999-9999",
                "tags": "cofounder, hotlead"
            })
        );
    }

    #[test]
    fn test_lead_data_from_json() {
        let data = LeadData::try_from(json!({"nome": "Ana"})).unwrap();
        assert_eq!(data.len(), 1);
        assert!(LeadData::try_from(Value::Null).unwrap().is_empty());
        assert!(LeadData::try_from(json!([1, 2])).is_err());

        let data: LeadData = serde_json::from_str(r#"{"nome":"Ana","tags":"vip"}"#).unwrap();
        assert_eq!(data.get("tags"), Some(&json!("vip")));
    }

    #[test]
    fn test_lead_ref_field_selection() {
        assert_eq!(LeadRef::from(42i64).field(), ("lead_id", json!(42)));
        assert_eq!(
            LeadRef::from("a@b.com").field(),
            ("email", json!("a@b.com"))
        );
        // Digits in an email string are still an email
        assert_eq!(LeadRef::from("42").field(), ("email", json!("42")));
    }

    #[test]
    fn test_lead_ref_blank() {
        assert!(LeadRef::from("").is_blank());
        assert!(LeadRef::from(0i64).is_blank());
        assert!(!LeadRef::from(7i64).is_blank());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("won".parse::<LeadStatus>().unwrap(), LeadStatus::Won);
        assert_eq!("lost".parse::<LeadStatus>().unwrap(), LeadStatus::Lost);
        assert!("".parse::<LeadStatus>().unwrap_err().is_invalid_argument());
        assert!("pending".parse::<LeadStatus>().unwrap_err().is_invalid_argument());
        assert!("WON".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_lifecycle_codes() {
        assert_eq!(i64::from(LifecycleStage::Lead), 0);
        assert_eq!(i64::from(LifecycleStage::QualifiedLead), 1);
        assert_eq!(i64::from(LifecycleStage::Customer), 2);
    }

    #[test]
    fn test_tracking_from_cookies() {
        let ctx = TrackingContext::from_cookies(Some(r#"{"id":"abc-123"}"#), Some("organic"));
        assert_eq!(ctx.client_id.as_deref(), Some("abc-123"));
        assert_eq!(ctx.traffic_source.as_deref(), Some("organic"));

        let ctx = TrackingContext::from_cookies(Some("not json"), None);
        assert!(ctx.is_empty());

        let ctx = TrackingContext::from_cookies(Some(r#"{"id":99}"#), Some(""));
        assert_eq!(ctx.client_id.as_deref(), Some("99"));
        assert_eq!(ctx.traffic_source, None);
    }

    #[test]
    fn test_tracking_from_encoded_cookie_header() {
        let header = "_ga=GA1.2.3; rdtrk=%7B%22id%22%3A%22xyz%22%7D; __trf_src=encoded_eyJmaXJzdF9zZXNzaW9uIjp7fX0%3D";
        let ctx = TrackingContext::from_cookie_header(header);
        assert_eq!(ctx.client_id.as_deref(), Some("xyz"));
        assert_eq!(
            ctx.traffic_source.as_deref(),
            Some("encoded_eyJmaXJzdF9zZXNzaW9uIjp7fX0=")
        );

        assert!(TrackingContext::from_cookie_header("").is_empty());
    }
}
