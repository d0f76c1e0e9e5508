#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(f64),
    Str(String),
    Identifier(String),
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    GreaterThan,
    LessThan,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThan => "<",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
    Plus,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Assign {
        name: String,
        value: Expression,
    },
    Print {
        arguments: Vec<Expression>,
    },
    /// Branch bodies hold exactly one statement today; they stay as
    /// sequences so execution iterates the same way a block would.
    If {
        condition: Expression,
        then_body: Vec<Statement>,
        else_body: Option<Vec<Statement>>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Expr(Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
}
