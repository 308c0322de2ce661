use sifter::Scopes;

#[derive(Scopes)]
enum Generic<const N: usize> {
    Active,
}

fn main() {}
