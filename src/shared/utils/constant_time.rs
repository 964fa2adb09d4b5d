/// 상수 시간 비교 (토큰 해시, 서비스 키)
/// Compare two byte strings without short-circuiting on the first difference.
/// Length is not secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
