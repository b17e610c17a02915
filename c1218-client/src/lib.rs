//! ANSI C12.18 client implementation
//!
//! This crate provides the service layer for talking to C12.19 meters
//! over the C12.18 optical port: session state, service requests and
//! responses, the client with its bounded retry policy, and decoders for
//! the discovery tables.
//!
//! # TODO
//!
//! ## 连接管理
//! - [x] 客户端构建器（Builder）模式实现
//! - [x] 串口连接（光学探头，支持 RTS 反相）
//! - [x] 会话状态管理（控制位、过程序号）
//! - [x] 有界重试（可配置次数与间隔）
//!
//! ## 服务
//! - [x] Ident / Negotiate / Logon / Security / Logoff / Terminate
//! - [x] 全表读、全表写
//! - [x] 偏移部分写
//! - [x] 过程调用（写表 7，读表 8）
//! - [x] 多表扫描（十表组、标准表、制造商表）
//! - [x] 安全码列表尝试（可选受限表验证）
//! - [ ] 偏移部分读（0x3F）
//! - [ ] 等待服务（Wait, 0x70）
//!
//! ## 表解析
//! - [x] 表 00（通用配置）
//! - [x] 表 01（制造商标识）

pub mod connection;
pub mod service;
pub mod session;
pub mod tables;

pub use connection::{C1218Client, ClientBuilder, TableReadEntry};
pub use service::{
    IdentInfo, NegotiatedParameters, ServiceCode, ServiceRequest, ServiceResponse, TableData,
};
pub use session::SessionState;
pub use tables::{GeneralConfig, ManufacturerIdentification};
