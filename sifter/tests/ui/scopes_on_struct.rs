use sifter::Scopes;

#[derive(Scopes)]
struct NotAnEnum;

fn main() {}
