// third-party imports
use criterion::criterion_main;

const ND: &str = ":"; // name delimiter

mod evaluate;
mod parse;

criterion_main!(parse::benches, evaluate::benches);
