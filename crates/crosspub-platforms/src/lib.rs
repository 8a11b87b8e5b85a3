//! Crosspub Platforms - Publishing Adapters
//!
//! One adapter per destination, each a scripted walk through the platform's
//! editor via the automation driver:
//! - WeChat official account (plus its REST material upload)
//! - Zhihu
//! - CSDN
//! - Xiaohongshu
//! - Douyin
//! - Kuaishou
//! - 51CTO
//!
//! Adapters implement [`crosspub_core::PlatformAdapter`]; the registry turns
//! a platform selection into an ordered adapter list.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod csdn;
pub mod cto51;
pub mod douyin;
pub mod kuaishou;
pub mod registry;
pub mod wechat;
pub mod xiaohongshu;
pub mod zhihu;

pub use csdn::CsdnAdapter;
pub use cto51::Cto51Adapter;
pub use douyin::DouyinAdapter;
pub use kuaishou::KuaishouAdapter;
pub use registry::build_adapters;
pub use wechat::{MaterialClient, MaterialError, WechatAdapter};
pub use xiaohongshu::XiaohongshuAdapter;
pub use zhihu::ZhihuAdapter;
