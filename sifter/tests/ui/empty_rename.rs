use sifter::Scopes;

#[derive(Scopes)]
enum Renamed {
    #[scope(rename = "")]
    Active,
}

fn main() {}
