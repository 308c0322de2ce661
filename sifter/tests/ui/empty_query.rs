use sifter::Scopes;

#[derive(Scopes)]
#[scope(query = "")]
enum Unregistered {
    Active,
}

fn main() {}
