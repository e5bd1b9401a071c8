// std imports
use std::{hint::black_box, time::Duration};

// third-party imports
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group};

// workspace imports
use plq::{PatternTemplate, Query, Templates};

// local imports
use super::ND;

criterion_group!(benches, bench);

const GROUP: &str = "parse";

const QUERIES: &[(&str, &str)] = &[
    ("single", r#"group ~ "^Sport""#),
    ("type", r#"type = live"#),
    (
        "chain",
        r#"group ~ "(?i)news" and not title ~ "replay" or type = vod and url ~ "\.m3u8$""#,
    ),
    (
        "nested",
        r#"not (group ~ "a" or (title ~ "b" and (name ~ "c" or not (caption ~ "d"))))"#,
    ),
];

fn bench(c: &mut Criterion) {
    let mut c = c.benchmark_group(GROUP);
    c.warm_up_time(Duration::from_secs(1));
    c.measurement_time(Duration::from_secs(3));

    for (name, query) in QUERIES {
        c.throughput(Throughput::Bytes(query.len() as u64));
        c.bench_with_input(BenchmarkId::new("query", name), query, |b, query| {
            b.iter(|| Query::parse(black_box(query)).unwrap());
        });
    }

    let templates = Templates::new(&[
        PatternTemplate::new("sports", r#"group ~ "(?i)sport""#),
        PatternTemplate::new("hd", r#"title ~ "HD$""#),
        PatternTemplate::new("hd_sports", "!sports! and !hd!"),
    ])
    .unwrap();

    let query = "!hd_sports! or type = series";
    c.throughput(Throughput::Bytes(query.len() as u64));
    c.bench_function(format!("templates{ND}hd_sports"), |b| {
        b.iter(|| plq::parse_with_templates(black_box(query), &templates).unwrap());
    });

    c.finish();
}
