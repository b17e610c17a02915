//! c1218 - Rust implementation of the ANSI C12.18 protocol
//!
//! This library implements the master side of ANSI C12.18, the optical
//! port protocol used to read and write C12.19 tables on electricity
//! meters.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `c1218-core`: Error taxonomy, response status codes, credentials, configuration
//! - `c1218-transport`: Transport layer (Serial, generic async I/O)
//! - `c1218-session`: Packet codec and link layer (ACK/NAK, fragment reassembly)
//! - `c1218-client`: Service layer (Ident, Logon, table reads/writes, procedures)
//!
//! # Implementation Status
//!
//! ## ✅ 已完成
//! - 数据包编解码（CRC-16/X-25，表校验和）
//! - 链路层（ACK/NAK、NAK 提示、多包重组）
//! - 服务层（登录序列、表读写、过程调用、有界重试）
//! - 表 00 / 表 01 解析
//!
//! ## 📋 待实现
//! - 多包请求发送
//! - 偏移部分读
//!
//! # Usage
//!
//! ```no_run
//! use c1218::client::ClientBuilder;
//! ```

// Re-export core types
pub use c1218_core::{
    C1218Config, C1218Error, C1218Result, ResponseStatus, SecurityCode, UserName,
};

// Re-export client API
pub mod client {
    pub use c1218_client::*;
}

// Re-export the link layer
pub mod link {
    pub use c1218_session::link::*;
}

// Re-export transports
pub mod transport {
    pub use c1218_transport::*;
}
