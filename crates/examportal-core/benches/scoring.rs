use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examportal_core::grammar::count_errors;
use examportal_core::similarity::{score, score_all};
use examportal_core::traits::{PosTag, PosTagger, TaggedToken};

struct WhitespaceTagger;

impl PosTagger for WhitespaceTagger {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        text.split_whitespace()
            .map(|w| {
                let tag = if w.chars().all(char::is_alphabetic) {
                    PosTag::Noun
                } else {
                    PosTag::X
                };
                TaggedToken::new(w, tag)
            })
            .collect()
    }
}

const SHORT_REF: &str = "quicksort";
const LONG_REF: &str = "A process is an instance of a program in execution. It has its own \
    address space, registers, program counter and open file table, and the operating \
    system schedules processes onto CPUs.";
const LONG_ANSWER: &str = "A process is a program that is running. Each process has an \
    address space and registers and a program counter, and the OS schedules them onto \
    the processor.";

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");

    group.bench_function("short", |b| {
        b.iter(|| score(black_box("bubblesort"), black_box(SHORT_REF)))
    });

    group.bench_function("paragraph", |b| {
        b.iter(|| score(black_box(LONG_ANSWER), black_box(LONG_REF)))
    });

    group.bench_function("ten_questions", |b| {
        let answers = vec![LONG_ANSWER; 10];
        let references = vec![LONG_REF; 10];
        b.iter(|| score_all(black_box(&answers), black_box(&references)))
    });

    group.finish();
}

fn bench_grammar(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar");

    group.bench_function("paragraph", |b| {
        b.iter(|| count_errors(&WhitespaceTagger, black_box(LONG_ANSWER)))
    });

    group.finish();
}

criterion_group!(benches, bench_similarity, bench_grammar);
criterion_main!(benches);
