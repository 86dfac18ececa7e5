use thiserror::Error;

/// Erreurs contractuelles du moteur. Calcul par lots déterministe :
/// aucune n'est transitoire, aucune n'est retentée — on propage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Tranche de tirages vide là où au moins un tirage est requis.
    #[error("aucun tirage fourni")]
    EmptyInput,

    /// Une stratégie ne peut pas produire le nombre de numéros demandé,
    /// même après repli. Configuration de jeu invalide.
    #[error("domaine insuffisant : {needed} numéros demandés, {available} disponibles")]
    InsufficientDomain { needed: usize, available: usize },

    /// Le découpage entraînement/test laisse une tranche vide.
    #[error("découpage au {cutoff} : la tranche {side} est vide")]
    InsufficientData { cutoff: String, side: &'static str },
}
