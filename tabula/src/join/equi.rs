//! This module validates and dispatches equi-joins.

use tabula_physical::{
    columnar::Column,
    join::{
        hash_join::{hash_filter, hash_join},
        nested_loop::cross_product,
        EquiJoinKind, FilterJoinKind, KeyEncoder,
    },
};

use crate::{error::Error, table::Table};

use super::{resolve_columns, result::ResultBuilder, JoinConfig, JoinSide, JoinType};

/// Resolved and type checked key columns of both sides
#[derive(Debug)]
struct JoinKeys<'a> {
    left: Vec<&'a Column>,
    right: Vec<&'a Column>,
}

impl<'a> JoinKeys<'a> {
    fn resolve(left: &'a Table, right: &'a Table, config: &JoinConfig) -> Result<Self, Error> {
        if config.left_on.len() != config.right_on.len() {
            return Err(Error::KeyCountMismatch {
                left: config.left_on.len(),
                right: config.right_on.len(),
            });
        }
        if config.left_on.is_empty() {
            return Err(Error::MissingJoinKeys(config.how));
        }

        let left_keys = resolve_columns(left, &config.left_on, JoinSide::Left)?;
        let right_keys = resolve_columns(right, &config.right_on, JoinSide::Right)?;

        for (left_key, right_key) in left_keys.iter().zip(&right_keys) {
            if !left_key
                .data_type()
                .is_join_compatible(&right_key.data_type())
            {
                return Err(Error::IncompatibleKeyTypes {
                    left: left_key.name().to_owned(),
                    left_type: left_key.data_type(),
                    right: right_key.name().to_owned(),
                    right_type: right_key.data_type(),
                });
            }
        }

        Ok(Self {
            left: left_keys,
            right: right_keys,
        })
    }

    /// Right key names that also name the paired left key.
    fn shared_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.left
            .iter()
            .copied()
            .zip(self.right.iter().copied())
            .filter(|(left, right)| left.name() == right.name())
            .map(|(_, right)| right.name())
    }
}

pub(super) fn equi_join(left: &Table, right: &Table, config: &JoinConfig) -> Result<Table, Error> {
    log::debug!(
        "{} join of {} x {} rows on {:?} = {:?}",
        config.how,
        left.height(),
        right.height(),
        config.left_on,
        config.right_on
    );

    let kind = match config.how {
        JoinType::Cross => {
            let indices = cross_product(left.height(), right.height(), &config.interrupt)?;
            return ResultBuilder::new(left, right, &config.suffix).build(&indices);
        }
        JoinType::Right => {
            let swapped = JoinConfig {
                how: JoinType::Left,
                left_on: config.right_on.clone(),
                right_on: config.left_on.clone(),
                ..config.clone()
            };
            return equi_join(right, left, &swapped);
        }
        JoinType::Semi | JoinType::Anti => {
            let keys = JoinKeys::resolve(left, right, config)?;
            let kind = if config.how == JoinType::Semi {
                FilterJoinKind::Semi
            } else {
                FilterJoinKind::Anti
            };

            let rows = hash_filter(
                &KeyEncoder::new(&keys.left),
                &KeyEncoder::new(&keys.right),
                kind,
                &config.interrupt,
            )?;
            return left.take(&rows);
        }
        JoinType::Inner => EquiJoinKind::Inner,
        JoinType::Left => EquiJoinKind::Left,
        JoinType::Outer => EquiJoinKind::Outer,
    };

    let keys = JoinKeys::resolve(left, right, config)?;
    let indices = hash_join(
        &KeyEncoder::new(&keys.left),
        &KeyEncoder::new(&keys.right),
        kind,
        &config.interrupt,
    )?;

    ResultBuilder::new(left, right, &config.suffix)
        .skip_right(keys.shared_names())
        .build(&indices)
}
