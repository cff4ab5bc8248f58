macro_rules! test {
    ($($lhs:expr => $rhs:expr),* $(,)?) => {
        $(assert_eq!($lhs, $rhs);)*
    };
}

mod ack;
mod command;
mod data;
