use std::collections::HashMap;
use std::fmt::Write;

use lazy_static::lazy_static;

pub type HostFunction = fn(&[f64], &mut String) -> f64;

// A host function user code may declare with extern and call
pub struct RuntimeFunction {
    pub arity: usize,
    pub function: HostFunction,
}

fn putchard(arguments: &[f64], output: &mut String) -> f64 {
    output.push(arguments[0] as u8 as char);
    0.0
}

fn printd(arguments: &[f64], output: &mut String) -> f64 {
    let _ = writeln!(output, "{:.6}", arguments[0]);
    0.0
}

macro_rules! unary_math {
    ($name:ident) => {
        |arguments: &[f64], _: &mut String| arguments[0].$name()
    };
}

lazy_static! {
    pub static ref RUNTIME: HashMap<&'static str, RuntimeFunction> = {
        let mut map: HashMap<&'static str, RuntimeFunction> = HashMap::new();
        let mut insert = |name: &'static str, arity: usize, function: HostFunction| {
            map.insert(name, RuntimeFunction { arity, function });
        };
        insert("putchard", 1, putchard);
        insert("printd", 1, printd);
        insert("sin", 1, unary_math!(sin));
        insert("cos", 1, unary_math!(cos));
        insert("tan", 1, unary_math!(tan));
        insert("sqrt", 1, unary_math!(sqrt));
        insert("exp", 1, unary_math!(exp));
        insert("log", 1, unary_math!(ln));
        insert("fabs", 1, unary_math!(abs));
        insert("floor", 1, unary_math!(floor));
        insert("ceil", 1, unary_math!(ceil));
        insert("pow", 2, |arguments, _| arguments[0].powf(arguments[1]));
        insert("fmod", 2, |arguments, _| arguments[0] % arguments[1]);
        map
    };
}

pub fn lookup(name: &str) -> Option<&'static RuntimeFunction> {
    RUNTIME.get(name)
}
