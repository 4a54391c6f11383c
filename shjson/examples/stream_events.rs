// SPDX-License-Identifier: Apache-2.0

// Prints the parse events of a JSON file, or of a built-in sample read in
// small chunks when no path is given.
//
//     cargo run --example stream_events -- data.json

use shjson::{basic_parse, ChunkReader, Event, IoReader, ParseError, Reader, StreamParser};

const SAMPLE: &[u8] =
    br#"[null,true,false,1,1.1,111111111111111111111.111111111111,"\u00d6sterreich"]"#;

fn print_events<R: Reader>(parser: StreamParser<R>) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    let mut count = 0;
    for event in parser {
        let event = event?;
        if event.is_end() {
            depth = depth.saturating_sub(1);
        }
        match &event {
            Event::Number(number) if number.is_integer() => {
                println!("{:indent$}{} (integer)", "", event, indent = depth * 2)
            }
            _ => println!("{:indent$}{}", "", event, indent = depth * 2),
        }
        if event.is_start() {
            depth += 1;
        }
        count += 1;
    }
    Ok(count)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let count = match std::env::args().nth(1) {
        Some(path) => {
            let file = std::fs::File::open(&path)?;
            print_events(basic_parse(IoReader::new(file)))?
        }
        None => {
            // Simulate a slow stream handing out 8 bytes at a time
            print_events(basic_parse(ChunkReader::new(SAMPLE, 8)))?
        }
    };
    println!("{} events", count);
    Ok(())
}
