//! Operator definitions for expressions.
//!
//! Operators render as their target-language spelling; precedence drives
//! parenthesization in the renderer.

use std::fmt;

/// Binary operators.
///
/// Organized by precedence from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `&`
    BitwiseAnd,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

impl BinaryOp {
    /// Precedence level; higher binds more tightly.
    pub fn precedence(&self) -> u8 {
        use BinaryOp::*;
        match self {
            LogicalOr => 3,
            LogicalAnd => 4,
            BitwiseOr => 5,
            BitwiseXor => 6,
            BitwiseAnd => 7,
            Equal | NotEqual => 8,
            Less | LessEqual | Greater | GreaterEqual => 9,
            ShiftLeft | ShiftRight => 10,
            Add | Sub => 11,
            Mul | Div | Mod => 12,
        }
    }

    /// Check if this operator is comparison-related.
    pub fn is_comparison(&self) -> bool {
        use BinaryOp::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;
        let s = match self {
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseAnd => "&",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
        };
        write!(f, "{}", s)
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-` negation
    Neg,
    /// `+` plus (unary)
    Plus,
    /// `!` logical NOT
    LogicalNot,
    /// `~` bitwise NOT
    BitwiseNot,
    /// `++` pre-increment
    PreInc,
    /// `--` pre-decrement
    PreDec,
    /// `*` dereference of a pointer-valued expression
    Deref,
}

impl UnaryOp {
    /// Whether this operator mutates its operand in place.
    pub fn is_inc_or_dec(&self) -> bool {
        matches!(self, UnaryOp::PreInc | UnaryOp::PreDec)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use UnaryOp::*;
        let s = match self {
            Neg => "-",
            Plus => "+",
            LogicalNot => "!",
            BitwiseNot => "~",
            PreInc => "++",
            PreDec => "--",
            Deref => "*",
        };
        write!(f, "{}", s)
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    /// `++` post-increment
    PostInc,
    /// `--` post-decrement
    PostDec,
}

impl fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PostfixOp::*;
        let s = match self {
            PostInc => "++",
            PostDec => "--",
        };
        write!(f, "{}", s)
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=` simple assignment
    Assign,
    /// `+=` add-assign
    AddAssign,
    /// `-=` subtract-assign
    SubAssign,
    /// `*=` multiply-assign
    MulAssign,
    /// `/=` divide-assign
    DivAssign,
    /// `%=` modulo-assign
    ModAssign,
    /// `&=` bitwise-and-assign
    AndAssign,
    /// `|=` bitwise-or-assign
    OrAssign,
    /// `^=` bitwise-xor-assign
    XorAssign,
    /// `<<=` shift-left-assign
    ShlAssign,
    /// `>>=` shift-right-assign
    ShrAssign,
}

impl AssignOp {
    /// Check if this is a simple assignment (not compound).
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Assign)
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AssignOp::*;
        let s = match self {
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_op_precedence() {
        assert!(BinaryOp::LogicalOr.precedence() < BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() < BinaryOp::Mul.precedence());
        assert!(BinaryOp::Less.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
    }

    #[test]
    fn display() {
        assert_eq!(BinaryOp::ShiftLeft.to_string(), "<<");
        assert_eq!(UnaryOp::Deref.to_string(), "*");
        assert_eq!(PostfixOp::PostDec.to_string(), "--");
        assert_eq!(AssignOp::AddAssign.to_string(), "+=");
    }

    #[test]
    fn assign_kinds() {
        assert!(AssignOp::Assign.is_simple());
        assert!(!AssignOp::AddAssign.is_simple());
        assert!(UnaryOp::PreInc.is_inc_or_dec());
        assert!(!UnaryOp::Deref.is_inc_or_dec());
    }
}
