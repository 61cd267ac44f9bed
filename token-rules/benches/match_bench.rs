use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use token_common::Token;
use token_rules::{ReferenceMode, TokenRule, TokenRuleContext, TokenStream};

// --- Data Generation ---
// "fn" "(" "a" "," "b" ")" "x" "x" ... repeated
fn generate_tokens(count: usize) -> Vec<Token> {
    let pattern = ["fn", "(", "a", ",", "b", ")", "x", "x", "y", ";"];
    pattern
        .iter()
        .cycle()
        .take(count)
        .map(|value| Token::text(*value))
        .collect()
}

fn call_rule() -> TokenRule {
    let ident = TokenRule::pattern("[a-z]+").unwrap();
    let args = ident
        .clone()
        .then(TokenRule::value(",").then(ident.clone()).zero_or_more());
    TokenRule::sequence([
        ident,
        TokenRule::value("("),
        args.optional(),
        TokenRule::value(")"),
    ])
    .unwrap()
}

fn nested_rule() -> TokenRule {
    TokenRule::recursive(|expr| {
        TokenRule::any_of([
            TokenRule::sequence([
                TokenRule::value("("),
                expr.zero_or_more(),
                TokenRule::value(")"),
            ])?,
            TokenRule::pattern("[a-z,]+")?,
        ])
    })
    .unwrap()
}

fn bench_find_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_scan");
    let size = 10_000;
    let tokens = generate_tokens(size);
    group.throughput(Throughput::Elements(size as u64));

    let call = call_rule();
    group.bench_function("find_all_calls", |b| {
        b.iter(|| call.find_all(&tokens).unwrap().len())
    });

    let doubled = TokenRule::pattern("[a-z]+")
        .unwrap()
        .capture("w")
        .then(TokenRule::reference("w", ReferenceMode::Dynamic));
    group.bench_function("find_all_back_references", |b| {
        b.iter(|| doubled.find_all(&tokens).unwrap().len())
    });

    group.finish();
}

fn bench_recursive(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_recursive");
    let depth = 200;
    let mut tokens: Vec<Token> = (0..depth).map(|_| Token::text("(")).collect();
    tokens.push(Token::text("leaf"));
    tokens.extend((0..depth).map(|_| Token::text(")")));
    let rule = nested_rule();

    group.throughput(Throughput::Elements(tokens.len() as u64));
    group.bench_function("nested_parens", |b| {
        b.iter(|| {
            let mut stream = TokenStream::new(tokens.clone());
            let mut ctx = TokenRuleContext::empty();
            rule.try_match(&mut stream, &mut ctx).unwrap().is_some()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_find_all, bench_recursive);
criterion_main!(benches);
