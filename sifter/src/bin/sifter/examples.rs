use crate::commands::{normalize, plan, scopes};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "normalize",
            groups: normalize::EXAMPLES,
        },
        CommandExample {
            name: "plan",
            groups: plan::EXAMPLES,
        },
        CommandExample {
            name: "scopes",
            groups: scopes::EXAMPLES,
        },
    ]
}
