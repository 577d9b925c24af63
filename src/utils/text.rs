// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 响应体最多保留的字符数
pub const MAX_RESPONSE_BODY_CHARS: usize = 1000;

/// 错误信息最多保留的字符数
pub const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// 按字符（而非字节）截断字符串
///
/// # 参数
///
/// * `text` - 原始字符串
/// * `max_chars` - 最多保留的字符数
///
/// # 返回值
///
/// 截断后的字符串，不会切断多字节字符
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
