use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kiln::{Cursor as _, Lexer, TokenKind};

static MARKUP: &str = "
# Heading with [a reference](docs/reference.md) and `inline code`
- first item: some words, 42 numbers
- second item (with parentheses) and *emphasis*
![image](img/picture.png)
# Heading with [a reference](docs/reference.md) and `inline code`
- first item: some words, 42 numbers
- second item (with parentheses) and *emphasis*
![image](img/picture.png)
# Heading with [a reference](docs/reference.md) and `inline code`
- first item: some words, 42 numbers
- second item (with parentheses) and *emphasis*
![image](img/picture.png)
# Heading with [a reference](docs/reference.md) and `inline code`
- first item: some words, 42 numbers
- second item (with parentheses) and *emphasis*
![image](img/picture.png)
";

static WORDS: &str =
    "It was the year when they finally immanentized the Eschaton It was the year when they \
     finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton It was the year when \
     they finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton";

static CANDIDATES: [(&str, &str); 2] = [("words", WORDS), ("markup", MARKUP)];

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| {
            b.iter(|| black_box(Lexer::new(s).map(Lexer::tokenize)))
        });
    }
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_words");

    group.throughput(Throughput::Bytes(WORDS.len() as u64));
    group.bench_function("words", |b| {
        b.iter(|| {
            let Ok(mut lexer) = Lexer::new(WORDS) else {
                return 0;
            };
            let mut words = 0;
            while lexer.is_active() {
                lexer.consume_while(TokenKind::WORD);
                lexer.consume_while(TokenKind::SPACE);
                words += 1;
            }
            black_box(words)
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_scan);
criterion_main!(benches);
