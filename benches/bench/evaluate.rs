// std imports
use std::{hint::black_box, time::Duration};

// third-party imports
use criterion::{BatchSize, Criterion, Throughput, criterion_group};

// workspace imports
use plq::{FilterMode, ItemType, PlaylistItem, Query, model::Field};

// local imports
use super::ND;

criterion_group!(benches, bench);

const GROUP: &str = "evaluate";

fn bench(c: &mut Criterion) {
    let mut c = c.benchmark_group(GROUP);
    c.warm_up_time(Duration::from_secs(1));
    c.measurement_time(Duration::from_secs(3));

    let query = Query::parse(r#"group ~ "(?i)^sport" and not title ~ "replay" or type = vod"#).unwrap();
    let items = samples(1000);

    let item = &items[0];
    c.bench_function(format!("matches{ND}single"), |b| {
        b.iter(|| query.matches(black_box(item)));
    });

    c.throughput(Throughput::Elements(items.len() as u64));
    for mode in [FilterMode::Include, FilterMode::Discard] {
        c.bench_function(format!("select{ND}{mode}"), |b| {
            b.iter(|| query.select(black_box(&items), mode).count());
        });
    }

    c.bench_function(format!("select{ND}owned"), |b| {
        b.iter_batched(
            || items.clone(),
            |items| query.filter(items).count(),
            BatchSize::LargeInput,
        );
    });

    c.finish();
}

fn samples(n: usize) -> Vec<PlaylistItem> {
    let groups = ["Sports", "News", "Kids", "SPORT HD", "Movies"];
    let types = [ItemType::Live, ItemType::Live, ItemType::Vod, ItemType::Series];

    (0..n)
        .map(|i| {
            PlaylistItem::new(types[i % types.len()])
                .with(Field::Group, groups[i % groups.len()])
                .with(Field::Title, if i % 7 == 0 { format!("Replay {i}") } else { format!("Channel {i}") })
                .with(Field::Url, format!("http://example.com/stream/{i}.m3u8"))
        })
        .collect()
}
