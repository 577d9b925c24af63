// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 计算负载签名
///
/// # 参数
///
/// * `payload` - 待签名的原始字节
/// * `secret` - 端点密钥
///
/// # 返回值
///
/// 小写十六进制的 HMAC-SHA256
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// 校验签名（常数时间比较）
///
/// # 参数
///
/// * `payload` - 收到的原始字节
/// * `secret` - 端点密钥
/// * `signature_hex` - 请求头中的十六进制签名
///
/// # 返回值
///
/// 签名匹配返回 `true`，格式错误或不匹配返回 `false`
pub fn verify(payload: &[u8], secret: &str, signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}
