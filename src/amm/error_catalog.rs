//! Catálogo imutável de erros do engine.
use core::fmt;

/// Código de erro do engine.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AmmErrorCode {
    /// Operações com montante de entrada zero.
    ZeroAmount,
    /// Pool vazio (sem reservas nem shares).
    PoolNotInitialized,
    /// Ativo não pertence ao par.
    AssetMismatch,
    /// Par criado com o mesmo ativo dos dois lados.
    IdenticalAssets,
    /// Divisor zero em conta interna.
    DivisionByZero,
    /// Overflow ou underflow em cálculos numéricos.
    ArithmeticOverflow,
    /// Tolerância de slippage do chamador seria violada.
    MaxSpreadExceeded,
    /// Troca esvaziaria a reserva de saída.
    InsufficientPoolLiquidity,
    /// Depósito inicial não cunha nenhuma share.
    InsufficientInitialLiquidity,
    /// Depósito ou resgate proporcional arredonda para zero.
    ZeroLiquidityContribution,
    /// Resgate de mais shares do que existem.
    InsufficientShares,
    /// Taxa fora de [0, 1] ou mal formatada.
    InvalidRate,
    /// Produto das reservas diminuiria.
    InvariantViolated,
}

impl AmmErrorCode {
    /// Código textual estável do erro.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "AMM-0001",
            Self::PoolNotInitialized => "AMM-0002",
            Self::AssetMismatch => "AMM-0003",
            Self::IdenticalAssets => "AMM-0004",
            Self::DivisionByZero => "AMM-0005",
            Self::ArithmeticOverflow => "AMM-0006",
            Self::MaxSpreadExceeded => "AMM-0007",
            Self::InsufficientPoolLiquidity => "AMM-0008",
            Self::InsufficientInitialLiquidity => "AMM-0009",
            Self::ZeroLiquidityContribution => "AMM-0010",
            Self::InsufficientShares => "AMM-0011",
            Self::InvalidRate => "AMM-0012",
            Self::InvariantViolated => "AMM-0013",
        }
    }

    /// Título curto em português.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "Quantidade zerada",
            Self::PoolNotInitialized => "Pool não inicializado",
            Self::AssetMismatch => "Ativo fora do par",
            Self::IdenticalAssets => "Ativos idênticos",
            Self::DivisionByZero => "Divisão por zero",
            Self::ArithmeticOverflow => "Overflow numérico",
            Self::MaxSpreadExceeded => "Spread máximo excedido",
            Self::InsufficientPoolLiquidity => "Liquidez insuficiente",
            Self::InsufficientInitialLiquidity => "Liquidez inicial insuficiente",
            Self::ZeroLiquidityContribution => "Contribuição nula",
            Self::InsufficientShares => "Shares insuficientes",
            Self::InvalidRate => "Taxa inválida",
            Self::InvariantViolated => "Invariante violado",
        }
    }

    /// Mensagem base em português. Placeholders `{chave}` vêm do contexto do erro.
    pub const fn message_pt(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "amount deve ser > 0",
            Self::PoolNotInitialized => "pool sem liquidez; forneça liquidez antes",
            Self::AssetMismatch => "ativo {asset} não pertence ao par",
            Self::IdenticalAssets => "os dois lados do par são o mesmo ativo",
            Self::DivisionByZero => "divisão por zero em {op}",
            Self::ArithmeticOverflow => "overflow/underflow numérico em {op}",
            Self::MaxSpreadExceeded => "spread {spread} acima do máximo {max_spread}",
            Self::InsufficientPoolLiquidity => "reserva de saída insuficiente para a troca",
            Self::InsufficientInitialLiquidity => "depósito inicial não cunha shares",
            Self::ZeroLiquidityContribution => "contribuição proporcional arredonda para 0",
            Self::InsufficientShares => "shares solicitadas excedem o supply",
            Self::InvalidRate => "taxa {value} inválida",
            Self::InvariantViolated => "produto das reservas diminuiria",
        }
    }

    /// Erros de parâmetro que o chamador pode corrigir e tentar de novo.
    pub const fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            Self::DivisionByZero | Self::ArithmeticOverflow | Self::InvariantViolated
        )
    }

    /// Retorna todas as variantes em ordem estável.
    pub fn all() -> &'static [AmmErrorCode] {
        const ALL: &[AmmErrorCode] = &[
            AmmErrorCode::ZeroAmount,
            AmmErrorCode::PoolNotInitialized,
            AmmErrorCode::AssetMismatch,
            AmmErrorCode::IdenticalAssets,
            AmmErrorCode::DivisionByZero,
            AmmErrorCode::ArithmeticOverflow,
            AmmErrorCode::MaxSpreadExceeded,
            AmmErrorCode::InsufficientPoolLiquidity,
            AmmErrorCode::InsufficientInitialLiquidity,
            AmmErrorCode::ZeroLiquidityContribution,
            AmmErrorCode::InsufficientShares,
            AmmErrorCode::InvalidRate,
            AmmErrorCode::InvariantViolated,
        ];
        ALL
    }
}

impl fmt::Display for AmmErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mensagem padrão na localidade ativa (pt-BR).
pub fn default_locale_message(code: AmmErrorCode) -> &'static str {
    code.message_pt()
}
