//! Response bodies for the informational endpoints.

use serde::Serialize;
use serde_json::{Value, json};

use chatrelay_types::agent::{AgentDescriptor, AgentKind};

/// Service name reported by `/health` and `/`.
pub const SERVICE_NAME: &str = "AI Agents Platform";

/// Public API version; independent of the crate version.
pub const API_VERSION: &str = "1.0.0";

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            service: SERVICE_NAME,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: API_VERSION,
        }
    }
}

/// Body of `GET /api/agents`.
#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub success: bool,
    pub agents: Vec<AgentDescriptor>,
}

/// Static documentation served at `GET /`.
pub fn api_documentation() -> Value {
    let agents: Vec<Value> = AgentKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "id": kind.as_str(),
                "name": kind.display_name(),
                "description": kind.description(),
                "icon": kind.icon(),
            })
        })
        .collect();

    json!({
        "service": format!("{SERVICE_NAME} API"),
        "version": API_VERSION,
        "description": "Chat relay API for AI agent interactions with incremental polling",
        "endpoints": {
            "GET /": {
                "description": "API documentation (this page)",
                "authentication": false
            },
            "GET /health": {
                "description": "Health check endpoint",
                "authentication": false
            },
            "POST /api/login": {
                "description": "User authentication",
                "authentication": false,
                "body": {
                    "email": "string (required)",
                    "password": "string (required)"
                },
                "response": {
                    "success": "boolean",
                    "token": "JWT token string",
                    "user": { "id": "string", "email": "string", "name": "string" }
                }
            },
            "GET /api/agents": {
                "description": "List available AI agents",
                "authentication": true,
                "headers": { "Authorization": "Bearer <jwt_token>" },
                "response": {
                    "success": "boolean",
                    "agents": "array of agent objects"
                }
            },
            "POST /api/chat": {
                "description": "Send a message; the answer is collected by polling the status endpoint",
                "authentication": true,
                "headers": { "Authorization": "Bearer <jwt_token>" },
                "body": {
                    "message": "string (required)",
                    "sessionId": "string (optional)",
                    "agentType": "string (generic|coding|financial|supervisor)"
                },
                "response": {
                    "success": "boolean",
                    "sessionId": "string",
                    "status": "processing",
                    "errorType": "auth|validation|config|throttling|agent_error|internal",
                    "retryAfter": "number (throttling only)"
                }
            },
            "GET /api/chat/status/{sessionId}": {
                "description": "Poll a session for chunks after lastChunkIndex",
                "authentication": false,
                "query": { "lastChunkIndex": "integer (optional, default -1)" },
                "response": {
                    "status": "processing|completed|error",
                    "routedAgentType": "string|null",
                    "chunks": "array of strings",
                    "totalChunks": "number",
                    "response": "string",
                    "errorMessage": "string (error only)"
                }
            }
        },
        "agents": agents,
        "authentication": {
            "type": "JWT (JSON Web Token)",
            "header": "Authorization: Bearer <token>",
            "expiry": "24 hours",
            "note": "Obtain token via POST /api/login"
        },
        "cors": {
            "enabled": true,
            "allowed_origins": "*",
            "allowed_methods": "GET, POST, OPTIONS",
            "allowed_headers": "Content-Type, Authorization"
        }
    })
}
