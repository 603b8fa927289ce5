/// Order a pair of user ids as (smaller, larger).
///
/// All swipe state for a pair lives under one key, so operand order must
/// never matter.
#[inline]
pub fn canonical_pair(user_a: i64, user_b: i64) -> (i64, i64) {
    if user_a > user_b {
        (user_b, user_a)
    } else {
        (user_a, user_b)
    }
}

/// Key holding both users' swipe fields, e.g. `swipes:3:17`.
pub fn pair_key(user_a: i64, user_b: i64) -> String {
    let (lo, hi) = canonical_pair(user_a, user_b);
    format!("swipes:{}:{}", lo, hi)
}

/// Field name for one user's swipe inside the pair hash, e.g. `3_swipe`.
pub fn swipe_field(user_id: i64) -> String {
    format!("{}_swipe", user_id)
}
