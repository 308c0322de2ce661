use sifter::Scopes;

#[derive(Scopes)]
enum Skipping {
    #[scope(skip)]
    Hidden,
}

fn main() {}
