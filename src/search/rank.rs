//! Edit distance ranking / 编辑距离排序

use super::schema::ResultItem;

/// Levenshtein edit distance over chars / 计算 Levenshtein 编辑距离
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    // Two rolling rows instead of the full matrix / 滚动数组
    let mut prev: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr = vec![0usize; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[s2_chars.len()]
}

/// Order items by distance to the keyword and cap the list / 按距离排序并截断
///
/// The sort is stable: items at equal distance keep their merge order.
pub fn rank_and_truncate(items: &mut Vec<ResultItem>, keyword: &str, max: usize) {
    items.sort_by_cached_key(|item| levenshtein_distance(keyword, &item.title));
    items.truncate(max);
}
