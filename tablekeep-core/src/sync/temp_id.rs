use rand::Rng;

/// Every locally minted id starts with this, so it can never collide with
/// a server id.
pub const TEMP_ID_PREFIX: &str = "tmp-";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// How placeholder ids for unconfirmed creates are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TempIdStrategy {
    /// `tmp-` followed by a random v4 UUID.
    #[default]
    Uuid,
    /// `tmp-` followed by the millisecond clock and 8 random characters,
    /// both base 36.
    Base36,
}

impl TempIdStrategy {
    pub fn generate(&self) -> String {
        match self {
            TempIdStrategy::Uuid => format!("{}{}", TEMP_ID_PREFIX, uuid::Uuid::new_v4()),
            TempIdStrategy::Base36 => {
                let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
                let mut rng = rand::rng();
                let suffix: String = (0..8)
                    .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
                    .collect();
                format!("{}{}-{}", TEMP_ID_PREFIX, to_base36(millis), suffix)
            }
        }
    }
}

pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
