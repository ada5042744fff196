pub mod all_different;
pub mod automaton;
pub mod element;
pub mod linear_modulo;
