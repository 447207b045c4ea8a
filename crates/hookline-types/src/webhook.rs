//! Webhook domain types for Hookline.
//!
//! `WebhookDefinition` is the stored description of an outbound HTTP call:
//! endpoint, method, headers (plaintext and encrypted), an optional JSON
//! body template, and an ordered field schema. Definitions are created and
//! edited by the surrounding application; the execution pipeline treats
//! them as read-only.
//!
//! Serde renames preserve the camelCase wire shape the existing dashboards
//! store and query.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workspace::MemberRole;

// ---------------------------------------------------------------------------
// WebhookDefinition
// ---------------------------------------------------------------------------

/// A stored, user-configured outbound webhook.
///
/// Invariant: a header key appears in at most one of `headers` /
/// `secure_headers` at a time. When a value is secure, `headers[key]`
/// holds a masking placeholder for display and the real ciphertext lives
/// in `secure_headers[key]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDefinition {
    /// UUIDv7 assigned on creation.
    pub id: Uuid,
    /// Workspace that owns this webhook.
    pub workspace_id: Uuid,
    /// User who created the definition.
    pub created_by: Uuid,
    /// Human-readable webhook name.
    pub name: String,
    /// Target URL of the outbound call.
    pub endpoint_url: String,
    /// HTTP method used for the outbound call.
    pub http_method: HttpMethod,
    /// Disabled webhooks fail authorization with a precondition error.
    pub is_enabled: bool,
    /// Plaintext request headers (masked placeholders for secure keys).
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Encrypted-at-rest header values, same key space as `headers`.
    #[serde(default)]
    pub secure_headers: HashMap<String, String>,
    /// Optional JSON body template rendered before dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_template: Option<String>,
    /// Ordered field schema applied to the request payload.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Caller-requested timeout ceiling in seconds (capped by tier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    /// Optional access restrictions. Absent means default-allow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<WebhookPermissions>,
}

/// HTTP methods a webhook may be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Methods that carry the transformed payload as a JSON request body.
    /// GET sends a non-empty payload as query parameters instead.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

// ---------------------------------------------------------------------------
// Field schema
// ---------------------------------------------------------------------------

/// One typed, optionally-required key in a webhook's payload schema.
///
/// `key` is a dot path into the payload tree (e.g. `user.address.city`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

/// Expected JSON type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

/// A single validation constraint on a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Rule operand: a number for min/max, a string for pattern, a list
    /// for enum.
    pub value: serde_json::Value,
    /// Custom failure message overriding the generated one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The kind of validation constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Min,
    Max,
    Pattern,
    Enum,
    /// Reserved. Currently a no-op.
    Custom,
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Access restrictions on a webhook.
///
/// A per-user exception takes precedence over the role list: an explicit
/// `deny` exception blocks a caller even when their role is allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPermissions {
    #[serde(default)]
    pub allowed_roles: Vec<MemberRole>,
    #[serde(default)]
    pub user_exceptions: Vec<UserException>,
}

/// A per-user allow/deny override, matched by user id or email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserException {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub access: ExceptionAccess,
}

/// Verdict of a user exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionAccess {
    Allow,
    Deny,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_definition_json() -> serde_json::Value {
        json!({
            "id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "workspaceId": "01890a5d-ac96-774b-bcce-b302099a8058",
            "createdBy": "01890a5d-ac96-774b-bcce-b302099a8059",
            "name": "notify-crm",
            "endpointUrl": "https://crm.example.com/hooks/lead",
            "httpMethod": "POST",
            "isEnabled": true,
            "headers": { "X-Api-Key": "****cafe" },
            "secureHeaders": { "X-Api-Key": "bm9uY2UuY2lwaGVydGV4dA==" },
            "bodyTemplate": "{\"lead\":{\"email\":\"\"}}",
            "fields": [{
                "key": "lead.email",
                "type": "string",
                "required": true,
                "validationRules": [
                    { "type": "pattern", "value": "^[^@]+@[^@]+$", "message": "must be an email" }
                ]
            }],
            "timeoutSeconds": 10,
            "permissions": {
                "allowedRoles": ["owner", "admin"],
                "userExceptions": [
                    { "userId": "01890a5d-ac96-774b-bcce-b302099a805a", "access": "allow" }
                ]
            }
        })
    }

    #[test]
    fn test_definition_round_trips_camel_case() {
        let def: WebhookDefinition =
            serde_json::from_value(sample_definition_json()).unwrap();
        assert_eq!(def.name, "notify-crm");
        assert_eq!(def.http_method, HttpMethod::Post);
        assert_eq!(def.fields[0].key, "lead.email");
        assert_eq!(def.fields[0].field_type, FieldType::String);
        assert_eq!(def.fields[0].validation_rules[0].rule_type, RuleType::Pattern);

        let back = serde_json::to_value(&def).unwrap();
        assert_eq!(back["endpointUrl"], "https://crm.example.com/hooks/lead");
        assert_eq!(back["httpMethod"], "POST");
        assert_eq!(back["fields"][0]["validationRules"][0]["type"], "pattern");
    }

    #[test]
    fn test_definition_defaults_apply() {
        let def: WebhookDefinition = serde_json::from_value(json!({
            "id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "workspaceId": "01890a5d-ac96-774b-bcce-b302099a8058",
            "createdBy": "01890a5d-ac96-774b-bcce-b302099a8059",
            "name": "bare",
            "endpointUrl": "https://example.com",
            "httpMethod": "GET",
            "isEnabled": false
        }))
        .unwrap();
        assert!(def.headers.is_empty());
        assert!(def.fields.is_empty());
        assert!(def.body_template.is_none());
        assert!(def.permissions.is_none());
    }

    #[test]
    fn test_http_method_has_body() {
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Put.has_body());
        assert!(HttpMethod::Patch.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }

    #[test]
    fn test_exception_access_serde() {
        assert_eq!(
            serde_json::to_value(ExceptionAccess::Deny).unwrap(),
            json!("deny")
        );
    }
}
