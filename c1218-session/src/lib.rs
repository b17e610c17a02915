//! Session layer module for the ANSI C12.18 protocol
//!
//! This crate provides the packet codec (framing, CRC-16/X-25, table data
//! checksum) and the link session that drives one request/response
//! exchange over a transport.
//!
//! # TODO
//!
//! ## 数据包编解码
//! - [x] 数据包编码/解码
//! - [x] CRC-16/X-25 计算和验证（低字节在前）
//! - [x] 表数据校验和
//!
//! ## 链路层
//! - [x] ACK/NAK 等待与 NAK 提示
//! - [x] 多包响应重组（自动 ACK）
//! - [x] 链路状态机
//! - [x] 链路统计信息
//! - [ ] 多包请求发送（请求数据超过协商的包大小时分包）

pub mod error;
pub mod link;

pub use error::{C1218Error, C1218Result};
pub use link::*;
