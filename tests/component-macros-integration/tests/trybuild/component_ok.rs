use component_macros::{autowired, interface, Component};
use di_abstractions::{Autowired, Registrable};
use std::sync::Arc;

#[interface]
pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Default, Component)]
#[component(implements(dyn Greeter))]
pub struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Default, Component)]
#[component(autowired)]
pub struct Host {
    greeter: Autowired<dyn Greeter>,
}

#[autowired]
impl Host {
    #[autowire]
    fn set_greeter(&self, greeter: Arc<dyn Greeter>) {
        self.greeter.inject(greeter);
    }
}

fn main() {
    assert_eq!(Host::type_definition().injectors.len(), 1);
    assert_eq!(English::type_definition().casts.len(), 1);
    assert!(<dyn Greeter>::type_definition().descriptor.is_interface());
}
