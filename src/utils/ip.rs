//! 客户端 IP 提取（登录限流用）
//!
//! 只有当 TCP 对端属于可信代理时才读取 X-Forwarded-For。

use std::net::{IpAddr, SocketAddr};

use actix_web::dev::ConnectionInfo;

/// 解析 "ip" 或 "ip:port"
fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .or_else(|_| raw.parse::<IpAddr>())
        .ok()
}

/// CIDR 检查，如 "10.0.0.0/8"、"fd00::/8"
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(network), Ok(prefix_len)) = (network.parse::<IpAddr>(), prefix_len.parse::<u32>())
    else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            u32::from(*ip) & mask == u32::from(net) & mask
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            u128::from(*ip) & mask == u128::from(net) & mask
        }
        _ => false,
    }
}

/// 检查 IP 是否在可信代理列表中（单 IP 或 CIDR）
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Some(ip) = parse_ip(ip) else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip)
        }
    })
}

/// 提取客户端 IP；没有对端地址时返回 None
pub fn client_ip(conn_info: &ConnectionInfo, trusted_proxies: &[String]) -> Option<String> {
    let peer = conn_info.peer_addr()?;

    if !trusted_proxies.is_empty() && is_trusted_proxy(peer, trusted_proxies) {
        let real = conn_info.realip_remote_addr().unwrap_or(peer);
        return Some(real.to_string());
    }

    Some(peer.to_string())
}
