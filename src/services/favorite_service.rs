// src/services/favorite_service.rs

use std::sync::Arc;

use futures_util::future::join_all;

use crate::{
    clients::CatalogPort,
    common::{
        error::AppError,
        pagination::{PageInfo, PageRequest},
    },
    db::{CarStore, FavoriteStore},
    models::{
        catalog::GarageSummary,
        favorite::{
            Favorite, FavoriteCheck, FavoriteCount, FavoriteFilter, FavoritePage,
            FavoritePagination, FavoriteView, ToggleAction, ToggleOutcome,
        },
    },
};

#[derive(Clone)]
pub struct FavoriteService {
    favorites: Arc<dyn FavoriteStore>,
    cars: Arc<dyn CarStore>,
    catalog: Arc<dyn CatalogPort>,
}

impl FavoriteService {
    pub fn new(
        favorites: Arc<dyn FavoriteStore>,
        cars: Arc<dyn CarStore>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self { favorites, cars, catalog }
    }

    /// Curtir / descurtir numa única chamada.
    pub async fn toggle(&self, garage_id: i32, automobile_id: i32) -> Result<ToggleOutcome, AppError> {
        // O DELETE ... RETURNING já é a checagem de existência
        if let Some(removed) = self.favorites.delete_pair(garage_id, automobile_id).await? {
            tracing::info!(garage_id, automobile_id, "💔 Favorito removido");
            return Ok(ToggleOutcome {
                action: ToggleAction::Removed,
                favorite: removed,
            });
        }

        let favorite = match self.insert_verified(garage_id, automobile_id).await {
            Ok(favorite) => favorite,
            // Outra requisição inseriu o mesmo par entre o DELETE e o INSERT
            Err(AppError::Conflict(message)) => self
                .favorites
                .find_pair(garage_id, automobile_id)
                .await?
                .ok_or(AppError::Conflict(message))?,
            Err(e) => return Err(e),
        };

        Ok(ToggleOutcome {
            action: ToggleAction::Added,
            favorite,
        })
    }

    /// Variante estrita: par já existente é Conflict.
    pub async fn add(&self, garage_id: i32, automobile_id: i32) -> Result<Favorite, AppError> {
        if self.favorites.find_pair(garage_id, automobile_id).await?.is_some() {
            return Err(AppError::conflict(
                "Esta garagem já está nos favoritos deste carro.",
            ));
        }

        self.insert_verified(garage_id, automobile_id).await
    }

    // Carro local e garagem no catálogo precisam existir na hora de curtir
    async fn insert_verified(&self, garage_id: i32, automobile_id: i32) -> Result<Favorite, AppError> {
        let car = self
            .cars
            .find_by_id(automobile_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Carro {automobile_id}")))?;

        self.catalog.garage(garage_id).await.map_err(|e| {
            tracing::warn!(garage_id, error = %e, "Garagem não encontrada ao favoritar");
            AppError::not_found(format!("Garagem {garage_id}"))
        })?;

        let favorite = self.favorites.insert(garage_id, car.id, car.user_id).await?;

        tracing::info!(garage_id, automobile_id, "⭐ Favorito adicionado");
        Ok(favorite)
    }

    /// Só banco local, sem catálogo.
    pub async fn check(&self, garage_id: i32, automobile_id: i32) -> Result<FavoriteCheck, AppError> {
        let favorite = self.favorites.find_pair(garage_id, automobile_id).await?;
        Ok(FavoriteCheck {
            is_favorite: favorite.is_some(),
            favorite,
        })
    }

    pub async fn list(&self, filter: FavoriteFilter, page: PageRequest) -> Result<FavoritePage, AppError> {
        let (rows, total) = self.favorites.list(filter, page).await?;

        let favorites = join_all(rows.into_iter().map(|favorite| self.enrich(favorite))).await;

        let info = PageInfo::new(page, total);
        Ok(FavoritePage {
            favorites,
            pagination: FavoritePagination {
                current_page: info.current_page,
                total_pages: info.total_pages,
                total_favorites: info.total,
                has_next: info.has_next,
                has_prev: info.has_prev,
            },
        })
    }

    // Garagem que sumiu do catálogo continua aparecendo, como placeholder
    async fn enrich(&self, favorite: Favorite) -> FavoriteView {
        let garage = match self.catalog.garage(favorite.garage_id).await {
            Ok(garage) => garage,
            Err(e) => {
                tracing::warn!(favorite_id = favorite.id, garage_id = favorite.garage_id, error = %e, "Garagem do favorito indisponível");
                GarageSummary::unavailable(favorite.garage_id)
            }
        };

        FavoriteView { favorite, garage }
    }

    /// Com `automobile_id`, só apaga se o favorito pertencer àquele carro.
    pub async fn delete(&self, favorite_id: i32, automobile_id: Option<i32>) -> Result<Favorite, AppError> {
        let deleted = self
            .favorites
            .delete(favorite_id, automobile_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Favorito {favorite_id}")))?;

        tracing::info!(favorite_id, "Favorito removido por id");
        Ok(deleted)
    }

    pub async fn count_for_garage(&self, garage_id: i32) -> Result<FavoriteCount, AppError> {
        let count = self.favorites.count_for_garage(garage_id).await?;
        Ok(FavoriteCount { garage_id, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::catalog::UNAVAILABLE_GARAGE_NAME,
        test_support::{car, garage, FakeCatalog, InMemoryCars, InMemoryFavorites},
    };

    struct Fixture {
        service: FavoriteService,
        favorites: Arc<InMemoryFavorites>,
        catalog: Arc<FakeCatalog>,
    }

    fn fixture() -> Fixture {
        let favorites = InMemoryFavorites::new();
        let catalog = FakeCatalog::with(
            vec![garage(1, None, None), garage(2, None, None), garage(3, None, None)],
            vec![],
        );
        let cars = InMemoryCars::with([car(3, Some(1)), car(4, Some(2))]);
        Fixture {
            service: FavoriteService::new(favorites.clone(), cars, catalog.clone()),
            favorites,
            catalog,
        }
    }

    #[tokio::test]
    async fn toggle_twice_round_trips() {
        let f = fixture();

        let first = f.service.toggle(2, 3).await.expect("adicionado");
        assert_eq!(first.action, ToggleAction::Added);
        assert_eq!(first.favorite.user_id, Some(1));
        assert!(f.service.check(2, 3).await.expect("check").is_favorite);

        let second = f.service.toggle(2, 3).await.expect("removido");
        assert_eq!(second.action, ToggleAction::Removed);
        assert_eq!(second.favorite.id, first.favorite.id);
        assert!(!f.service.check(2, 3).await.expect("check").is_favorite);
        assert!(f.favorites.rows().is_empty());
    }

    #[tokio::test]
    async fn toggle_reports_added_when_a_concurrent_insert_wins() {
        let f = fixture();
        let existing = f.service.add(2, 3).await.expect("inserido pela outra requisição");
        f.favorites.set_stale_reads(true);

        let outcome = f.service.toggle(2, 3).await.expect("conflito absorvido");

        assert_eq!(outcome.action, ToggleAction::Added);
        assert_eq!(outcome.favorite.id, existing.id);
        assert_eq!(f.favorites.rows().len(), 1);
    }

    #[tokio::test]
    async fn toggle_add_requires_car_and_live_garage() {
        let f = fixture();

        assert!(matches!(f.service.toggle(2, 99).await, Err(AppError::NotFound(_))));
        assert!(matches!(f.service.toggle(50, 3).await, Err(AppError::NotFound(_))));

        f.catalog.set_down(true);
        assert!(matches!(f.service.toggle(2, 3).await, Err(AppError::NotFound(_))));
        assert!(f.favorites.rows().is_empty());
    }

    #[tokio::test]
    async fn toggle_remove_works_while_catalog_is_down() {
        let f = fixture();
        f.service.toggle(1, 3).await.expect("adicionado");
        f.catalog.set_down(true);

        let outcome = f.service.toggle(1, 3).await.expect("remoção não depende do catálogo");
        assert_eq!(outcome.action, ToggleAction::Removed);
    }

    #[tokio::test]
    async fn add_rejects_duplicates() {
        let f = fixture();
        f.service.add(1, 3).await.expect("primeiro add");

        let duplicate = f.service.add(1, 3).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
        assert_eq!(f.favorites.rows().len(), 1);
    }

    #[tokio::test]
    async fn list_uses_placeholder_for_vanished_garage() {
        let f = fixture();
        f.service.add(1, 3).await.expect("fav 1");
        f.service.add(2, 3).await.expect("fav 2");
        f.catalog.remove_garage(1);

        let page = f
            .service
            .list(FavoriteFilter { user_id: Some(1), ..Default::default() }, PageRequest::default())
            .await
            .expect("listagem");

        assert_eq!(page.favorites.len(), 2);
        assert_eq!(page.pagination.total_favorites, 2);
        assert_eq!(page.favorites[0].garage.name, UNAVAILABLE_GARAGE_NAME);
        assert_eq!(page.favorites[0].garage.id, 1);
        assert_eq!(page.favorites[1].garage.name, "Garage 2");
    }

    #[tokio::test]
    async fn list_by_user_follows_car_owner() {
        let f = fixture();
        f.service.add(1, 3).await.expect("carro 3 é do user 1");
        f.service.add(1, 4).await.expect("carro 4 é do user 2");

        let page = f
            .service
            .list(FavoriteFilter { user_id: Some(2), ..Default::default() }, PageRequest::default())
            .await
            .expect("listagem");

        assert_eq!(page.favorites.len(), 1);
        assert_eq!(page.favorites[0].favorite.automobile_id, 4);
    }

    #[tokio::test]
    async fn delete_is_narrowed_by_owner() {
        let f = fixture();
        let favorite = f.service.add(1, 3).await.expect("fav");

        let wrong_owner = f.service.delete(favorite.id, Some(4)).await;
        assert!(matches!(wrong_owner, Err(AppError::NotFound(_))));
        assert_eq!(f.favorites.rows().len(), 1);

        let deleted = f.service.delete(favorite.id, Some(3)).await.expect("dono certo");
        assert_eq!(deleted.id, favorite.id);
        assert!(matches!(f.service.delete(favorite.id, None).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn counts_favorites_per_garage() {
        let f = fixture();
        f.service.add(2, 3).await.expect("fav");
        f.service.add(2, 4).await.expect("fav");
        f.service.add(1, 4).await.expect("fav");

        assert_eq!(f.service.count_for_garage(2).await.expect("count").count, 2);
        assert_eq!(f.service.count_for_garage(3).await.expect("count").count, 0);
    }
}
