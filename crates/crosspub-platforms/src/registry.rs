//! Adapter registry
//!
//! Turns the requested platform set into an ordered adapter list. The order
//! of the input is the dispatch order.

use std::sync::Arc;

use anyhow::Context;

use crosspub_core::{AppConfig, Platform, PlatformAdapter};

use crate::csdn::CsdnAdapter;
use crate::cto51::Cto51Adapter;
use crate::douyin::DouyinAdapter;
use crate::kuaishou::KuaishouAdapter;
use crate::wechat::{MaterialClient, WechatAdapter};
use crate::xiaohongshu::XiaohongshuAdapter;
use crate::zhihu::ZhihuAdapter;

/// Build adapters for `platforms`, in the given order
pub fn build_adapters(
    platforms: &[Platform],
    config: &AppConfig,
) -> anyhow::Result<Vec<Arc<dyn PlatformAdapter>>> {
    platforms
        .iter()
        .map(|&platform| build_one(platform, config))
        .collect()
}

fn build_one(platform: Platform, config: &AppConfig) -> anyhow::Result<Arc<dyn PlatformAdapter>> {
    let adapter: Arc<dyn PlatformAdapter> = match platform {
        Platform::Wechat => {
            let material = MaterialClient::new(&config.wechat)
                .context("building the wechat material client")?;
            Arc::new(WechatAdapter::new(material))
        }
        Platform::Zhihu => Arc::new(ZhihuAdapter),
        Platform::Csdn => Arc::new(CsdnAdapter),
        Platform::Xiaohongshu => Arc::new(XiaohongshuAdapter),
        Platform::Douyin => Arc::new(DouyinAdapter),
        Platform::Kuaishou => Arc::new(KuaishouAdapter),
        Platform::Cto51 => Arc::new(Cto51Adapter),
    };
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_core::{DingTalkCredentials, WechatCredentials};

    fn config() -> AppConfig {
        AppConfig::new(
            DingTalkCredentials {
                app_key: "k".to_string(),
                app_secret: "s".to_string(),
                user_id: "u".to_string(),
            },
            WechatCredentials {
                app_id: "a".to_string(),
                app_secret: "s".to_string(),
            },
        )
    }

    #[test]
    fn test_every_known_platform_has_an_adapter() {
        let adapters = build_adapters(&Platform::ALL, &config()).unwrap();
        assert_eq!(adapters.len(), Platform::ALL.len());
        for (adapter, platform) in adapters.iter().zip(Platform::ALL) {
            assert_eq!(adapter.platform(), platform);
        }
    }

    #[test]
    fn test_request_order_is_adapter_order() {
        let order = [Platform::Csdn, Platform::Wechat, Platform::Zhihu];
        let adapters = build_adapters(&order, &config()).unwrap();
        let built: Vec<Platform> = adapters.iter().map(|a| a.platform()).collect();
        assert_eq!(built, order);
    }
}
