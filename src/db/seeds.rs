/// Sample catalog: ten panels across ROOM1..ROOM4, enough to exercise
/// direct, multi-hop and cross-spine routes for every interface type.
/// Fields: dcim_id, room, name, rack, u, interface, size, destination,
/// status, ports remaining, classification.
pub(crate) fn sample_panel_params() -> Vec<(
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
)> {
    vec![
        ("DCIM001", "ROOM1", "Panel-01", "A01-C02", "42", "RJ", "48", "A01-C03", "True", "A01-C03: 12", "red"),
        ("DCIM002", "ROOM1", "Panel-02", "A01-C02", "41", "RJ", "24", "A05-C09", "True", "A05-C09: 8", "black"),
        ("DCIM003", "ROOM2", "Panel-03", "A01-C03", "42", "MM-LC", "24", "A05-C10", "True", "A05-C10: 16", "red"),
        ("DCIM004", "ROOM2", "Panel-04", "A01-C05", "42", "SM-LC", "48", "A07-C07", "False", "A07-C07: 0", "black"),
        ("DCIM005", "ROOM2", "Panel-05", "A05-C09", "41", "RJ", "48", "A07-C09", "True", "A07-C09: 24", "red"),
        ("DCIM006", "ROOM2", "Panel-06", "A05-C09", "42", "MM-LC", "24", "A01-C02", "False", "A01-C02: 24", "black"),
        ("DCIM007", "ROOM2", "Panel-07", "A05-C10", "42", "RJ", "48", "A07-C07", "True", "A07-C07: 36", "red"),
        ("DCIM008", "ROOM3", "Panel-08", "A07-C07", "41", "SM-LC", "24", "A01-C05", "True", "A01-C05: 18", "black"),
        ("DCIM009", "ROOM3", "Panel-09", "A07-C07", "42", "RJ", "48", "A01-C02", "True", "A01-C02: 42", "red"),
        ("DCIM010", "ROOM4", "Panel-10", "A07-C09", "42", "MM-LC", "24", "A05-C09", "True", "A05-C09: 4", "black"),
    ]
}
