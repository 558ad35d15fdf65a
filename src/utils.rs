//! Text helpers for admin menu titles and links / 菜单标题与链接工具函数

use once_cell::sync::Lazy;
use regex::Regex;

/// Counter badges rendered after a menu title, e.g. `Plugins <span class="update-plugins">3</span>`
static BADGE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\s*<span\b.*$").unwrap());

/// Remove the badge markup from a menu title / 去除菜单标题中的角标
pub fn clean_menu_title(title: &str) -> String {
    BADGE_SUFFIX.replace(title, "").trim().to_string()
}

/// Upper-case the first character / 首字母大写
pub fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Value of a query parameter in a relative admin URL / 获取URL查询参数
/// `post-new.php?post_type=page&x=1` + `post_type` -> `page`
pub fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Case-insensitive containment / 忽略大小写的包含判断
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
