#![no_main]
use libfuzzer_sys::fuzz_target;
use fano::{CodeTable, encode, decode};

fuzz_target!(|data: &[u8]| {
    let table = match CodeTable::from_data(data) {
        Ok(table) => table,
        Err(_) => return,
    };
    let packed = encode::Encoder::new(&table).encode(data).unwrap();

    let result = decode::Decoder::with_tree_walk(&table).decode(&packed);
    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(result.unwrap(), data);
});
