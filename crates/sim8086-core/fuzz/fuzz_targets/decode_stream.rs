#![no_main]

use libfuzzer_sys::fuzz_target;
use sim8086_core::{disassemble, Dispatcher, NullTrace, Processor, RegisterFile};

fuzz_target!(|data: &[u8]| {
    let mut processor = Processor::default();
    let _ = processor.decode_stream(data);

    let mut regs = RegisterFile::new();
    let mut dispatcher = Dispatcher::new(data);
    let _ = dispatcher.run(&mut regs, &mut NullTrace);
    assert!(dispatcher.cursor() <= data.len());

    let rows = disassemble(data);
    let covered: usize = rows.iter().map(|row| row.bytes.len()).sum();
    assert_eq!(covered, data.len());

    if data.len() >= 2 {
        let reported = i64::from(data[0]) - 128;
        let _ = processor.decode_loaded(&data[1..], reported, &mut NullTrace);
    }
});
