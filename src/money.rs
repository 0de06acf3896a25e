//! Money formatting

use rusty_money::{Formatter, Money, Params, Position, iso};

const RUPIAH_POSITIONS: &[Position] = &[Position::Symbol, Position::Space, Position::Amount];
const RUPIAH_GROUPING: &[usize] = &[3, 3, 3, 3, 3, 3];

/// Format a whole-rupiah amount the way Indonesian listings show prices:
/// `Rp` and a space, then the amount with `.` between thousands and no
/// minor units, e.g. `Rp 45.000`.
pub fn format_rupiah(amount: u64) -> String {
    let major = i64::try_from(amount).unwrap_or(i64::MAX);
    let money = Money::from_major(major, iso::IDR);

    Formatter::money(
        &money,
        Params {
            digit_separator: '.',
            exponent_separator: ',',
            separator_pattern: RUPIAH_GROUPING,
            positions: RUPIAH_POSITIONS,
            rounding: Some(0),
            symbol: Some("Rp"),
            code: None,
        },
    )
}
