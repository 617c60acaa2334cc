//! IP 地址处理工具
//!
//! The requesting address is the socket peer. When the peer is a private or
//! loopback address we assume a local reverse proxy and prefer
//! `X-Forwarded-For` / `X-Real-IP`.

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// 从 HttpRequest 提取客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    client_ip(req.peer_addr(), req.headers())
}

/// Resolve the client address from the socket peer and forwarding headers
pub fn client_ip(peer: Option<SocketAddr>, headers: &HeaderMap) -> Option<String> {
    match peer {
        Some(addr) if is_private_or_local(&addr.ip()) => {
            Some(forwarded_ip(headers).unwrap_or_else(|| addr.ip().to_string()))
        }
        Some(addr) => Some(addr.ip().to_string()),
        // 无 peer（测试请求等）时只能相信转发头
        None => forwarded_ip(headers),
    }
}

/// 从请求头提取转发的 IP（X-Forwarded-For 或 X-Real-IP）
pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}
