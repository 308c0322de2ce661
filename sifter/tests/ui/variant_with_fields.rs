use sifter::Scopes;

#[derive(Scopes)]
enum WithData {
    ByAuthor(String),
}

fn main() {}
