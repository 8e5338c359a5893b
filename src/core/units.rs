pub const JOULES_PER_KILOJOULE: u32 = 1_000;
pub const SECONDS_PER_MINUTE: u32 = 60;
