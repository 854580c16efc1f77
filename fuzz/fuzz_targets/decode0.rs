#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let table = fano::CodeTable::from_data(b"the quick brown fox").unwrap();
    let scan = fano::decode::Decoder::new(&table).decode(raw_data);
    let walk = fano::decode::Decoder::with_tree_walk(&table).decode(raw_data);
    assert_eq!(scan, walk);
});
