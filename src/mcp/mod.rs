// src/mcp/mod.rs
// MCP server exposing the PLC Web API as schema-validated tools

pub mod tools;

use crate::credentials::CredentialStore;
use crate::rpc::DeviceClient;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// MCP server state: the injected session store and device client shared by
/// every operation
#[derive(Clone)]
pub struct BridgeServer {
    pub store: Arc<CredentialStore>,
    pub client: Arc<DeviceClient>,
    tool_router: ToolRouter<Self>,
}

impl BridgeServer {
    pub fn new(store: Arc<CredentialStore>, client: Arc<DeviceClient>) -> Self {
        Self {
            store,
            client,
            tool_router: Self::tool_router(),
        }
    }
}

// Input enumerations. Schema-level validation: an invalid mode string is
// rejected before any operation code runs.

/// PlcProgram.Browse behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BrowseMode {
    /// Metadata of the named tag
    Var,
    /// Immediate children of the named tag (or of the root)
    Children,
}

impl BrowseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Children => "children",
        }
    }
}

/// Tag value representation for reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    Simple,
    Complete,
}

impl ReadMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complete => "complete",
        }
    }
}

/// CPU operating mode that can be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Run,
    Stop,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Stop => "stop",
        }
    }
}

/// Block categories for PlcProgram.Browse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    CodeBlocks,
    DataBlocks,
    Tags,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeBlocks => "code_blocks",
            Self::DataBlocks => "data_blocks",
            Self::Tags => "tags",
        }
    }
}

/// Attribute filter for alarm and diagnostic buffer browsing
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BrowseFilters {
    #[schemars(description = "Whether the listed attributes are included or excluded")]
    pub mode: FilterMode,
    #[schemars(description = "Attribute names the mode applies to")]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Include,
    Exclude,
}

// Request types for the tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EndpointRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoginRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "User name")]
    pub username: String,
    #[schemars(description = "Password")]
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChangePasswordRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "User name")]
    pub username: String,
    #[schemars(description = "Current password")]
    pub password: String,
    #[schemars(description = "New password; must satisfy the CPU password policy")]
    pub new_password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CloseTicketRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Ticket ID to close")]
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProgramBrowseRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Tag to browse; required when mode is \"var\"")]
    pub var: Option<String>,
    #[schemars(description = "\"var\" for one tag's metadata, \"children\" for its descendants")]
    pub mode: BrowseMode,
    #[schemars(description = "Restrict results to block categories")]
    pub types: Option<Vec<BlockType>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProgramReadRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Tag to read, e.g. \"\\\"MyDB\\\".MyVariable\"")]
    pub var: String,
    #[schemars(description = "Value representation; defaults to \"simple\"")]
    pub mode: Option<ReadMode>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProgramWriteRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Tag to write, e.g. \"\\\"MyDB\\\".MyVariable\"")]
    pub var: String,
    #[schemars(description = "Value to write: boolean, number or string")]
    pub value: Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct OperatingModeRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Requested operating mode")]
    pub mode: OperatingMode,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SystemTimeRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "ISO 8601 timestamp, e.g. \"2026-01-01T00:00:00Z\"")]
    pub timestamp: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AlarmsBrowseRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Text language in RFC 4647 format; defaults to \"en-US\"")]
    pub language: Option<String>,
    #[schemars(description = "Maximum number of entries; 0 requests the last-change summary")]
    pub count: Option<u32>,
    #[schemars(description = "Restrict to one alarm ID; only \"count\" may be combined with it")]
    pub alarm_id: Option<String>,
    #[schemars(description = "Attribute filter; defaults to alarm_text/status/timestamp included")]
    pub filters: Option<BrowseFilters>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AcknowledgeRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Alarm ID to acknowledge")]
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DiagnosticBufferBrowseRequest {
    #[schemars(description = "PLC IP address")]
    pub plc_ip_address: String,
    #[schemars(description = "Text language in RFC 4647 format; defaults to \"en-US\"")]
    pub language: Option<String>,
    #[schemars(description = "Maximum number of entries")]
    pub count: Option<u32>,
    #[schemars(description = "Attribute filter; defaults to short_text/long_text/help_text included")]
    pub filters: Option<BrowseFilters>,
}

#[tool_router]
impl BridgeServer {
    #[tool(
        description = "Open a Web API session on a PLC. Ask the user for the username and password. The session token is stored and attached to all subsequent calls for this PLC until logout."
    )]
    async fn api_login(&self, Parameters(req): Parameters<LoginRequest>) -> Result<String, String> {
        tools::api::login(self, req.plc_ip_address, req.username, req.password).await
    }

    #[tool(description = "End the Web API session for a PLC and drop its stored token.")]
    async fn api_logout(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::logout(self, req.plc_ip_address).await
    }

    #[tool(
        description = "Reachability probe. Returns the CPU ID, which changes on every CPU restart. No authorization required."
    )]
    async fn api_ping(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::ping(self, req.plc_ip_address).await
    }

    #[tool(description = "Read the Web API version of the CPU. No authorization required.")]
    async fn api_version(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::version(self, req.plc_ip_address).await
    }

    #[tool(
        description = "List all Web API methods the CPU firmware supports. No authorization required."
    )]
    async fn api_browse(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::browse(self, req.plc_ip_address).await
    }

    #[tool(description = "List the actions the logged-in user is authorized to perform.")]
    async fn api_get_permissions(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::get_permissions(self, req.plc_ip_address).await
    }

    #[tool(description = "Read quantity structure information of the Web server.")]
    async fn api_get_quantity_structures(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::get_quantity_structures(self, req.plc_ip_address).await
    }

    #[tool(
        description = "Read the CPU password policy. Useful before changing a password. No authorization required."
    )]
    async fn api_get_password_policy(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::api::get_password_policy(self, req.plc_ip_address).await
    }

    #[tool(
        description = "Change a user account password. Requires the current password; read the password policy first to avoid rejections."
    )]
    async fn api_change_password(
        &self,
        Parameters(req): Parameters<ChangePasswordRequest>,
    ) -> Result<String, String> {
        tools::api::change_password(
            self,
            req.plc_ip_address,
            req.username,
            req.password,
            req.new_password,
        )
        .await
    }

    #[tool(description = "Close a ticket held by the current session to free device resources.")]
    async fn api_close_ticket(
        &self,
        Parameters(req): Parameters<CloseTicketRequest>,
    ) -> Result<String, String> {
        tools::api::close_ticket(self, req.plc_ip_address, req.id).await
    }

    #[tool(
        description = "Search PLC tags and their metadata. Requires the \"read_value\" permission."
    )]
    async fn plc_program_browse(
        &self,
        Parameters(req): Parameters<ProgramBrowseRequest>,
    ) -> Result<String, String> {
        tools::program::browse(self, req.plc_ip_address, req.var, req.mode, req.types).await
    }

    #[tool(
        description = "Read a single tag from the CPU. Requires the \"read_value\" permission."
    )]
    async fn plc_program_read(
        &self,
        Parameters(req): Parameters<ProgramReadRequest>,
    ) -> Result<String, String> {
        tools::program::read(self, req.plc_ip_address, req.var, req.mode).await
    }

    #[tool(
        description = "Write a single tag on the CPU. Requires the \"write_value\" permission. The device applies its own typing and truncation rules."
    )]
    async fn plc_program_write(
        &self,
        Parameters(req): Parameters<ProgramWriteRequest>,
    ) -> Result<String, String> {
        tools::program::write(self, req.plc_ip_address, req.var, req.value).await
    }

    #[tool(
        description = "Read the CPU operating mode. Requires the \"read_diagnostics\" permission."
    )]
    async fn plc_read_operating_mode(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::plc::read_operating_mode(self, req.plc_ip_address).await
    }

    #[tool(description = "Request RUN or STOP mode for the CPU.")]
    async fn plc_request_change_operating_mode(
        &self,
        Parameters(req): Parameters<OperatingModeRequest>,
    ) -> Result<String, String> {
        tools::plc::request_change_operating_mode(self, req.plc_ip_address, req.mode).await
    }

    #[tool(description = "Read the CPU system time (UTC when synchronized).")]
    async fn plc_read_system_time(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::plc::read_system_time(self, req.plc_ip_address).await
    }

    #[tool(
        description = "Set the CPU system time. Requires the \"change_time_settings\" permission."
    )]
    async fn plc_set_system_time(
        &self,
        Parameters(req): Parameters<SystemTimeRequest>,
    ) -> Result<String, String> {
        tools::plc::set_system_time(self, req.plc_ip_address, req.timestamp).await
    }

    #[tool(
        description = "Request a backup ticket for the CPU configuration and a download URL for it. The CPU must be in STOP mode. Requires the \"backup_plc\" permission."
    )]
    async fn plc_create_backup(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::plc::create_backup(self, req.plc_ip_address).await
    }

    #[tool(
        description = "Browse alarms currently active on the CPU. Requires the \"read_diagnostics\" permission."
    )]
    async fn alarms_browse(
        &self,
        Parameters(req): Parameters<AlarmsBrowseRequest>,
    ) -> Result<String, String> {
        tools::diagnostics::alarms_browse(
            self,
            req.plc_ip_address,
            req.language,
            req.count,
            req.alarm_id,
            req.filters,
        )
        .await
    }

    #[tool(description = "Acknowledge a single alarm by its ID.")]
    async fn alarms_acknowledge(
        &self,
        Parameters(req): Parameters<AcknowledgeRequest>,
    ) -> Result<String, String> {
        tools::diagnostics::alarms_acknowledge(self, req.plc_ip_address, req.id).await
    }

    #[tool(
        description = "Read entries from the CPU diagnostic buffer. Requires the \"read_diagnostics\" permission."
    )]
    async fn diagnostic_buffer_browse(
        &self,
        Parameters(req): Parameters<DiagnosticBufferBrowseRequest>,
    ) -> Result<String, String> {
        tools::diagnostics::diagnostic_buffer_browse(
            self,
            req.plc_ip_address,
            req.language,
            req.count,
            req.filters,
        )
        .await
    }

    #[tool(
        description = "List the project languages available on the CPU for alarm and diagnostic texts."
    )]
    async fn project_read_languages(
        &self,
        Parameters(req): Parameters<EndpointRequest>,
    ) -> Result<String, String> {
        tools::diagnostics::read_languages(self, req.plc_ip_address).await
    }

    #[tool(
        description = "List all configured PLCs with their names and IP addresses. Local lookup, no authorization required."
    )]
    async fn list_available_plcs(&self) -> Result<String, String> {
        tools::api::list_available_plcs().await
    }
}

#[tool_handler]
impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "s7-bridge".into(),
                title: Some("S7 Bridge - Siemens PLC Web API tools for AI agents".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bridge to Siemens S7-1500/S7-1200 PLC Web APIs. Discover endpoints with \
                 list_available_plcs, authenticate with api_login, then read and write tags, \
                 browse alarms and diagnostics, and manage the CPU. Most operations need an \
                 authenticated session for the target PLC."
                    .into(),
            ),
        }
    }
}
