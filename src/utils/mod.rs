pub mod ip;
pub mod password;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 邮件验证码：至少包含一个小写字母、一个大写字母和一个数字
pub fn generate_verification_code(length: usize) -> String {
    let length = length.max(3);
    let pick = |set: &[u8]| set[rand::random_range(0..set.len())];

    let mut code: Vec<u8> = vec![pick(LOWER), pick(UPPER), pick(DIGITS)];
    let all: Vec<u8> = [LOWER, UPPER, DIGITS].concat();
    code.extend((3..length).map(|_| pick(&all)));
    for i in (1..code.len()).rev() {
        code.swap(i, rand::random_range(0..=i));
    }

    code.into_iter().map(char::from).collect()
}

/// 生成安全随机 token（JWT secret 兜底）
pub fn generate_secure_token(length: usize) -> String {
    generate_random_code(length)
}

/// 转义 LIKE 通配符（配合 ESCAPE '\'）
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length() {
        assert_eq!(generate_random_code(12).len(), 12);
        assert!(generate_random_code(32).chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_verification_code_has_every_class() {
        for _ in 0..50 {
            let code = generate_verification_code(8);
            assert_eq!(code.len(), 8);
            assert!(code.chars().any(|c| c.is_ascii_lowercase()));
            assert!(code.chars().any(|c| c.is_ascii_uppercase()));
            assert!(code.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("java"), "java");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
