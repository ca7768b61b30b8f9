#![no_main]

use libfuzzer_sys::fuzz_target;
use timeslide_core::time::{self, LabelFormat};
use timeslide_core::value::MetaValue;

fuzz_target!(|data: &[u8]| {
    // First byte picks the label window; the rest is the raw time text.
    let Some((&window, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let substring = LabelFormat::Substring {
        start: usize::from(window >> 4),
        length: usize::from(window & 0x0f) + 1,
    };

    let raw = MetaValue::from(text);
    for is_epoch in [false, true] {
        let _ = time::to_display_label(&raw, is_epoch, LabelFormat::YearOnly);
        let label = time::to_display_label(&raw, is_epoch, substring);
        assert!(label.len() <= text.len());
        let _ = time::to_equality_key(&raw, is_epoch);
    }

    // Parsing and ordering agree for strings.
    assert_eq!(time::parse_date(text), time::ordering_instant(&raw));

    // Numbers from the same bytes never panic and respect the epoch range.
    if rest.len() >= 8 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&rest[..8]);
        let n = MetaValue::Number(f64::from_le_bytes(bytes));
        if let Some(instant) = time::ordering_instant(&n) {
            assert!(instant.millis().unsigned_abs() <= time::MAX_EPOCH_MILLIS as u64);
        }
        let _ = time::to_display_label(&n, true, substring);
    }
});
