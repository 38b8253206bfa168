mod error;
mod interface;
mod process;
mod result;
mod session;

pub use error::ChannelError;
pub use interface::{SessionAck, ToolSession};
pub use process::{StdioSession, StdioToolHost};
pub use result::{ContentItem, ToolPayload, ToolResult};
pub use session::{McpSession, PROTOCOL_VERSION};
