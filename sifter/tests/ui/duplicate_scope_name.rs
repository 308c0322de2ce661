use sifter::Scopes;

#[derive(Scopes)]
enum Dupes {
    Active,
    #[scope(rename = "active")]
    AlsoActive,
}

fn main() {}
