use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizline_core::model::{Question, SelectedAnswers};
use quizline_core::scoring::{percent, tally};
use quizline_core::timer::TimerDisplay;

fn make_questions(n: usize) -> (Vec<Question>, SelectedAnswers) {
    let questions: Vec<Question> = (0..n)
        .map(|i| Question {
            id: format!("q{i}"),
            text: format!("Question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: Some("a".into()),
        })
        .collect();
    let answers = questions
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 0)
        .map(|(i, q)| (q.id.clone(), if i % 2 == 0 { "a" } else { "b" }.to_string()))
        .collect();
    (questions, answers)
}

fn bench_tally(c: &mut Criterion) {
    let mut group = c.benchmark_group("tally");

    for n in [10, 100, 1000] {
        let (questions, answers) = make_questions(n);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| tally(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_percent(c: &mut Criterion) {
    c.bench_function("percent", |b| {
        b.iter(|| percent(black_box(37), black_box(52)))
    });
}

fn bench_timer_display(c: &mut Criterion) {
    c.bench_function("timer_display", |b| {
        b.iter(|| TimerDisplay::new(black_box(119)))
    });
}

criterion_group!(benches, bench_tally, bench_percent, bench_timer_display);
criterion_main!(benches);
