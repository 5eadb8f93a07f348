pub trait EqualLen {
    fn validate_lengths(&self) -> bool;
}
